// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! SaltantClient: the authenticated entry point to a saltant server.

use tracing::{debug, info, instrument};

use crate::config::SdkConfig;
use crate::error::{Result, SdkError};
use crate::http::{HTTP_200_OK, Session};
use crate::models::{
    ContainerTaskInstanceManager, ContainerTaskTypeManager, ExecutableTaskInstanceManager,
    ExecutableTaskTypeManager, TaskQueueManager, TaskWhitelistManager, UserManager,
};
use crate::resource::{Resource, ResourceManager};

/// Path requested to check the credentials. Read-only and authenticated.
const AUTH_CHECK_PATH: &str = "users/";

/// High-level client for a saltant server.
///
/// Owns the authenticated session and hands out one manager per resource
/// family. Managers borrow the client, so they are cheap to create on each
/// call. The client is `Send + Sync`; share it by reference across threads.
#[derive(Debug)]
pub struct SaltantClient {
    session: Session,
    config: SdkConfig,
}

impl SaltantClient {
    /// Create a client with the given configuration.
    ///
    /// When `config.test_if_authenticated` is set, one read-only request is
    /// made so bad credentials fail here rather than on first use.
    #[instrument(skip(config), fields(base_api_url = %config.base_api_url))]
    pub fn new(config: SdkConfig) -> Result<Self> {
        config.validate()?;

        let session = Session::new(
            &config.base_api_url,
            &config.auth_token,
            config.request_timeout,
        );
        let client = Self { session, config };

        if client.config.test_if_authenticated {
            client.test_authentication()?;
        }

        info!("Saltant client ready");
        Ok(client)
    }

    /// Create a client from `SALTANT_API_URL` and `SALTANT_AUTH_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let config = SdkConfig::from_env()?;
        Self::new(config)
    }

    /// Check that the credentials are accepted by the server.
    ///
    /// Transport failures come back as `Connection`; any non-200 answer
    /// is an `Authentication` error.
    pub fn test_authentication(&self) -> Result<()> {
        debug!("Testing authentication");

        let response = self.session.get(AUTH_CHECK_PATH, &[])?;
        if response.status != HTTP_200_OK {
            return Err(SdkError::Authentication(format!(
                "authentication invalid: {} returned status {}",
                response.url, response.status
            )));
        }
        Ok(())
    }

    /// Get the SDK configuration.
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// The underlying HTTP session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Manager for any resource family.
    pub fn manager<R: Resource>(&self) -> ResourceManager<'_, R> {
        ResourceManager::new(&self.session)
    }

    pub fn task_queues(&self) -> TaskQueueManager<'_> {
        self.manager()
    }

    pub fn task_whitelists(&self) -> TaskWhitelistManager<'_> {
        self.manager()
    }

    pub fn users(&self) -> UserManager<'_> {
        self.manager()
    }

    pub fn executable_task_types(&self) -> ExecutableTaskTypeManager<'_> {
        self.manager()
    }

    pub fn container_task_types(&self) -> ContainerTaskTypeManager<'_> {
        self.manager()
    }

    pub fn executable_task_instances(&self) -> ExecutableTaskInstanceManager<'_> {
        self.manager()
    }

    pub fn container_task_instances(&self) -> ContainerTaskInstanceManager<'_> {
        self.manager()
    }
}
