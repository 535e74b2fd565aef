//! Matrix client encryption setup and recovery.
//!
//! Matrix end-to-end encryption needs several pieces working together:
//! cross-signing to validate device trust, key backup to store message keys
//! on the server, and secret storage protected by a passphrase. The
//! [`setup_client`] entry point handles all of them, either creating a
//! fresh session or restoring a persisted one.

use anyhow::bail;
use log::{debug, error, info};
use matrix_sdk::{
    Client,
    encryption::{
        BackupDownloadStrategy, EncryptionSettings,
        recovery::{RecoveryError, RecoveryState},
    },
    ruma::{OwnedUserId, api::client::uiaa},
};

use crate::matrix::{UserCredentials, session::MatrixSession};

/// Bootstraps cross-signing for the client if not already configured.
///
/// The first bootstrap attempt runs without authentication; when the server
/// answers with a UIAA challenge, the attempt is retried with the account
/// password.
///
/// See <https://docs.rs/matrix-sdk/latest/matrix_sdk/encryption/struct.Encryption.html#method.bootstrap_cross_signing_if_needed>
async fn bootstrap_cross_signing(
    client: &Client,
    UserCredentials {
        user_id,
        password,
        passphrase: _,
    }: &UserCredentials,
) -> Result<(), anyhow::Error> {
    debug!("setting up cross signing");

    if let Err(e) = client
        .encryption()
        .bootstrap_cross_signing_if_needed(None)
        .await
    {
        let Some(response) = e.as_uiaa_response() else {
            bail!("error bootstrapping cross signing: {:?}", e);
        };

        let mut password = uiaa::Password::new(
            uiaa::UserIdentifier::UserIdOrLocalpart(user_id.to_owned()),
            password.to_owned(),
        );
        password.session = response.session.clone();

        // The retry skips the needed-check, the first attempt answered that
        client
            .encryption()
            .bootstrap_cross_signing(Some(uiaa::AuthData::Password(password)))
            .await?;

        debug!("cross signing set up");
        return Ok(());
    }

    debug!("cross signing already set up");
    Ok(())
}

/// Enables key backup and secret storage for the client.
///
/// A backup already existing on the server is fine; any other failure is
/// returned.
///
/// See <https://docs.rs/matrix-sdk/latest/matrix_sdk/encryption/recovery/struct.Recovery.html#method.enable>
async fn enable_recovery(
    client: &Client,
    user_credentials: &UserCredentials,
) -> Result<(), anyhow::Error> {
    debug!("enabling recovery");

    let recovery = client.encryption().recovery();

    match recovery
        .enable()
        .with_passphrase(&user_credentials.passphrase)
        .await
    {
        Ok(_) => debug!("recovery enabled"),
        Err(e) => match e {
            RecoveryError::BackupExistsOnServer => {
                debug!("recovery already enabled");
            }
            _ => bail!("error enabling recovery: {:?}", e),
        },
    }

    Ok(())
}

/// Verifies that encryption is properly configured.
///
/// Recovery must be enabled and the current device must be part of the
/// cross-signing trust chain before the client joins encrypted rooms.
async fn encryption_check(client: &Client) -> Result<(), anyhow::Error> {
    let recovery = client.encryption().recovery();
    if recovery.state() != RecoveryState::Enabled {
        error!("recovery is not enabled after enabling it");
        return Err(anyhow::anyhow!("recovery is disabled after enabling it"));
    }

    // Client is logged in so the own device is always available
    let device = client.encryption().get_own_device().await?.unwrap();
    if !device.is_verified() {
        error!("device is not verified after setting up encryption");
        return Err(anyhow::anyhow!(
            "device is not verified after setting up encryption"
        ));
    }

    Ok(())
}

/// Creates a new Matrix session with full encryption setup.
///
/// Logs in, bootstraps cross-signing, enables key backup and secret
/// storage, recovers the secrets, validates the setup and persists the
/// session for later restoration.
async fn create_session(
    user_credentials: &UserCredentials,
    matrix_session: &MatrixSession,
) -> Result<Client, anyhow::Error> {
    // Enable key backup and cross signing by default
    let encryption_settings = EncryptionSettings {
        auto_enable_cross_signing: true,
        backup_download_strategy: BackupDownloadStrategy::default(),
        auto_enable_backups: true,
    };

    let user_id: OwnedUserId = user_credentials.user_id.clone().try_into()?;
    let client = Client::builder()
        .sqlite_store(
            matrix_session.get_sqlite_path(),
            Some(&user_credentials.passphrase),
        )
        .with_encryption_settings(encryption_settings)
        .server_name(user_id.server_name())
        .build()
        .await?;

    debug!("matrix client created");

    client
        .matrix_auth()
        .login_username(user_id, &user_credentials.password)
        .initial_device_display_name("rollo bot")
        .send()
        .await?;

    bootstrap_cross_signing(&client, user_credentials).await?;
    enable_recovery(&client, user_credentials).await?;

    // Recover all secrets using the passphrase
    debug!("trying to recover secrets");
    let recovery = client.encryption().recovery();
    recovery.recover(&user_credentials.passphrase).await?;
    debug!("secrets recovered");

    encryption_check(&client).await?;

    // Persist the user session for the next start
    let user_session = client.matrix_auth().session().unwrap();
    if let Err(err) = matrix_session.persist_user_session(&user_session).await {
        error!("error persisting user session: {:?}", err);
        return Err(anyhow::anyhow!("error persisting user session: {:?}", err));
    }

    info!("matrix client setup complete");
    Ok(client)
}

/// Restores an existing Matrix session from persisted storage.
///
/// Faster than a fresh login: the session is restored from disk and the
/// encryption secrets are imported from secret storage.
async fn restore_session(
    user_credentials: &UserCredentials,
    matrix_session: &MatrixSession,
) -> Result<Client, anyhow::Error> {
    info!("restoring matrix session from disk");

    let user_id: OwnedUserId = user_credentials.user_id.clone().try_into()?;
    let client: Client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(
            matrix_session.get_sqlite_path(),
            Some(&user_credentials.passphrase),
        )
        .build()
        .await?;

    // Restore the session, the caller checked it exists
    client
        .restore_session(matrix_session.get_user_session().unwrap().clone())
        .await?;

    // Import secrets from secret storage
    let secret_store = client
        .encryption()
        .secret_storage()
        .open_secret_store(&user_credentials.passphrase)
        .await?;
    secret_store.import_secrets().await?;

    encryption_check(&client).await?;

    info!("matrix session restored successfully");

    Ok(client)
}

/// Sets up a Matrix client with encryption, cross-signing and key backup.
///
/// Restores a persisted session when the session manager has one, performs
/// a fresh login otherwise. Both paths end with a client whose device is
/// verified and whose encryption keys are available.
///
/// # Errors
///
/// Returns an error if login, restoration or any encryption step fails.
pub async fn setup_client(
    user_credentials: &UserCredentials,
    matrix_session: &MatrixSession,
) -> Result<Client, anyhow::Error> {
    info!(
        "setting up matrix client for user {}",
        user_credentials.user_id
    );

    if matrix_session.has_session() {
        restore_session(user_credentials, matrix_session).await
    } else {
        create_session(user_credentials, matrix_session).await
    }
}
