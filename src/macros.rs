/// Generate client methods with oneshot channel boilerplate and automatic tracing.
///
/// The generated method sends `$request::$variant { params.., respond_to }` to the
/// service mailbox and awaits the reply. A closed mailbox or a dropped responder
/// is reported as `$error::$unavailable`.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error:ident::$unavailable:ident) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| $error::$unavailable("Service closed".to_string()))?;

                response
                    .await
                    .map_err(|_| $error::$unavailable("Service dropped request".to_string()))?
            }
        }
    };
}
