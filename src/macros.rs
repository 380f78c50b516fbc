//! Request/response plumbing shared by every actor service.

/// One-shot reply channel carried inside each request message.
pub type ServiceResponse<T, E> = tokio::sync::oneshot::Sender<Result<T, E>>;

/// Generate a client method that sends a request and awaits the reply.
///
/// Channel failures map to the error type's `ActorCommunication` variant, so
/// every error enum used here must have one taking a `String`.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, $error:ty) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> std::result::Result<$return_type, $error> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|e| <$error>::ActorCommunication(e.to_string()))?;

                response
                    .await
                    .map_err(|e| <$error>::ActorCommunication(e.to_string()))?
            }
        }
    };
}

/// Generate the fire-and-forget `shutdown` method of a client.
macro_rules! client_shutdown {
    ($client:ty, $request:ident, $error:ty) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn shutdown(&self) -> std::result::Result<(), $error> {
                tracing::debug!("Sending shutdown request");
                self.sender
                    .send($request::Shutdown)
                    .await
                    .map_err(|e| <$error>::ActorCommunication(e.to_string()))
            }
        }
    };
}

/// Reply with an error and return from the handler.
macro_rules! send_error {
    ($respond_to:expr, $error:expr) => {{
        let _ = $respond_to.send(Err($error));
        return;
    }};
}
