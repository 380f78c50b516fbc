use std::error::Error;

use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

use order_placement::app_system::{setup_tracing, OrderSystem, SystemConfig};
use order_placement::domain::{NewCustomer, NewProduct, OrderRequest, RequestedProduct};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = SystemConfig::from_env()?;
    setup_tracing(&config);

    info!("Starting application with complete order system");

    let system = OrderSystem::new(&config);

    let span = tracing::info_span!("catalog_setup");
    let setup = async {
        info!("Registering customer and product");
        let customer = system
            .customer_client
            .create_customer(NewCustomer::new("Alice", "alice@example.com"))
            .await?;
        let keyboard = system
            .product_client
            .create_product(NewProduct::new("Keyboard", Decimal::new(1000, 2), 5))
            .await?;
        Ok::<_, Box<dyn Error>>((customer, keyboard))
    }
    .instrument(span)
    .await;

    let (customer, keyboard) = match setup {
        Ok(seeded) => seeded,
        Err(e) => {
            error!(error = %e, "Catalog setup failed");
            system.shutdown().await;
            return Err(e);
        }
    };

    info!(customer_id = %customer.id, product_id = %keyboard.id, "Catalog ready");

    let span = tracing::info_span!("order_processing");
    let placed = async {
        info!("Placing order for three keyboards");
        system
            .order_client
            .place_order(OrderRequest::new(
                customer.id.clone(),
                vec![RequestedProduct::new(keyboard.id.clone(), 3)],
            ))
            .await
    }
    .instrument(span)
    .await;

    match &placed {
        Ok(order) => info!(order_id = %order.id, total = ?order.total(), "Order processed successfully"),
        Err(e) => error!(error = %e, "Order processing failed"),
    }

    // Two keyboards are left, so asking for both is refused.
    let refused = system
        .order_client
        .place_order(OrderRequest::new(
            customer.id.clone(),
            vec![RequestedProduct::new(keyboard.id.clone(), 2)],
        ))
        .await;
    if let Err(e) = refused {
        info!(error = %e, "Second order refused");
    }

    if let Ok(order) = placed {
        let stored = system.order_client.get_order(order.id.clone()).await?;
        info!(found = stored.is_some(), "Looked up placed order");
    }

    system.shutdown().await;

    info!("Application completed successfully");
    Ok(())
}
