use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::domain::{Customer, NewCustomer};
use crate::error::CustomerError;
use crate::macros::ServiceResponse;
use crate::ports::CustomerDirectory;

#[derive(Debug)]
pub enum CustomerRequest {
    GetCustomer {
        id: String,
        respond_to: ServiceResponse<Option<Customer>, CustomerError>,
    },
    CreateCustomer {
        customer: NewCustomer,
        respond_to: ServiceResponse<Customer, CustomerError>,
    },
    Shutdown,
    #[cfg(test)]
    GetCustomerCount {
        respond_to: ServiceResponse<usize, CustomerError>,
    },
}

/// Owns the registered customers and answers lookups for order placement.
pub struct CustomerService {
    receiver: mpsc::Receiver<CustomerRequest>,
    customers: HashMap<String, Customer>,
    next_id: u64,
}

impl CustomerService {
    pub fn new(buffer_size: usize) -> (Self, CustomerClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            customers: HashMap::new(),
            next_id: 1,
        };
        (service, CustomerClient::new(sender))
    }

    #[instrument(name = "customer_service", skip(self))]
    pub async fn run(mut self) {
        info!("CustomerService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CustomerRequest::GetCustomer { id, respond_to } => {
                    self.handle_get_customer(id, respond_to);
                }
                CustomerRequest::CreateCustomer { customer, respond_to } => {
                    self.handle_create_customer(customer, respond_to);
                }
                CustomerRequest::Shutdown => {
                    info!("CustomerService shutting down");
                    break;
                }
                #[cfg(test)]
                CustomerRequest::GetCustomerCount { respond_to } => {
                    let _ = respond_to.send(Ok(self.customers.len()));
                }
            }
        }

        info!("CustomerService stopped");
    }

    #[instrument(fields(customer_id = %id), skip(self, respond_to))]
    fn handle_get_customer(
        &self,
        id: String,
        respond_to: ServiceResponse<Option<Customer>, CustomerError>,
    ) {
        debug!("Processing get_customer request");

        let customer = self.customers.get(&id).cloned();
        match &customer {
            Some(customer) => info!(customer_name = %customer.name, "Customer found"),
            None => debug!("Customer not found"),
        }

        let _ = respond_to.send(Ok(customer));
    }

    #[instrument(fields(customer_email = %customer.email), skip(self, customer, respond_to))]
    fn handle_create_customer(
        &mut self,
        customer: NewCustomer,
        respond_to: ServiceResponse<Customer, CustomerError>,
    ) {
        debug!("Processing create_customer request");

        if customer.name.trim().is_empty() || customer.email.trim().is_empty() {
            warn!("Validation failed: name and email are required");
            send_error!(
                respond_to,
                CustomerError::Validation("name and email are required".to_string())
            );
        }

        if self.customers.values().any(|c| c.email == customer.email) {
            warn!("Email already registered");
            send_error!(respond_to, CustomerError::EmailInUse(customer.email));
        }

        let id = format!("customer_{}", self.next_id);
        self.next_id += 1;
        let created = Customer {
            id: id.clone(),
            name: customer.name,
            email: customer.email,
        };
        self.customers.insert(id.clone(), created.clone());

        info!(customer_id = %id, "Customer created successfully");
        let _ = respond_to.send(Ok(created));
    }
}

/// Handle for [`CustomerService`].
#[derive(Clone)]
pub struct CustomerClient {
    sender: mpsc::Sender<CustomerRequest>,
}

impl CustomerClient {
    pub fn new(sender: mpsc::Sender<CustomerRequest>) -> Self {
        Self { sender }
    }
}

client_method!(CustomerClient => fn get_customer(id: String) -> Option<Customer> as CustomerRequest::GetCustomer, CustomerError);
client_method!(CustomerClient => fn create_customer(customer: NewCustomer) -> Customer as CustomerRequest::CreateCustomer, CustomerError);
client_shutdown!(CustomerClient, CustomerRequest, CustomerError);

#[cfg(test)]
client_method!(CustomerClient => fn get_customer_count() -> usize as CustomerRequest::GetCustomerCount, CustomerError);

#[async_trait]
impl CustomerDirectory for CustomerClient {
    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, CustomerError> {
        self.get_customer(id.to_string()).await
    }
}
