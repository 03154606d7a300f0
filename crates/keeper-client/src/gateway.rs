//! Backend abstraction.

use std::future::Future;

use keeper_proto::{Passphrase, SecretKey};

use crate::{
    error::GatewayError,
    secret::{CreateParams, CreatedSecret, RevealedSecret},
};

/// The two operations the backend offers.
///
/// Implementations are shared between tasks, so both the gateway and the
/// futures it returns must be `Send`.
pub trait SecretGateway: Send + Sync {
    /// Store a secret.
    ///
    /// When the backend does not say whether the secret needs a passphrase,
    /// implementations report whether one was sent.
    fn create_secret(
        &self,
        params: &CreateParams,
    ) -> impl Future<Output = Result<CreatedSecret, GatewayError>> + Send;

    /// Retrieve a secret.
    ///
    /// A missing, expired or already consumed secret, and a wrong passphrase,
    /// all yield [`GatewayError::NotFound`].
    fn fetch_secret(
        &self,
        key: &SecretKey,
        passphrase: Option<&Passphrase>,
    ) -> impl Future<Output = Result<RevealedSecret, GatewayError>> + Send;
}
