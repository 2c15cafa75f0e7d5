// ── Service facade ──
//
// The exposed query surface for the application layer. Owns the repository
// (and through it the bound directory connection) for one request lifecycle:
// connect + bind at construction, release via `disconnect`, with `oneshot`
// guaranteeing the release on every exit path.

use std::sync::Arc;

use tracing::{debug, info, warn};

use dirbook_api::{DirectoryClient, LdapDirectory};

use crate::config::DirectoryConfig;
use crate::error::CoreError;
use crate::model::{Contact, ContactAttribute, Group, Visibility};
use crate::repository::{ContactRepository, RequestContext};
use crate::settings::SettingsProvider;
use crate::stats::{Statistic, StatisticsEngine, StatisticsReport};
use crate::visibility::{ToggleOutcome, VisibilityToggler};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc`; all state is per-request and immutable after
/// construction.
pub struct ContactService<D> {
    inner: Arc<ServiceInner<D>>,
}

impl<D> Clone for ContactService<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ServiceInner<D> {
    repo: ContactRepository<D>,
    ctx: RequestContext,
}

impl<D: DirectoryClient> ContactService<D> {
    /// Build a service over an already-connected directory client.
    pub fn new(
        dir: D,
        config: DirectoryConfig,
        settings: Arc<dyn SettingsProvider>,
        ctx: RequestContext,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let repo = ContactRepository::new(dir, config, settings)?;
        Ok(Self {
            inner: Arc::new(ServiceInner { repo, ctx }),
        })
    }

    pub fn context(&self) -> &RequestContext {
        &self.inner.ctx
    }

    pub fn repository(&self) -> &ContactRepository<D> {
        &self.inner.repo
    }

    // ── Contact queries ──────────────────────────────────────────────

    pub async fn list_visible_users(&self) -> Result<Vec<Contact>, CoreError> {
        self.inner
            .repo
            .list_users(&self.inner.ctx, Visibility::Visible)
            .await
    }

    pub async fn list_hidden_users(&self) -> Result<Vec<Contact>, CoreError> {
        self.inner
            .repo
            .list_users(&self.inner.ctx, Visibility::Hidden)
            .await
    }

    pub async fn get_own_contact(&self) -> Result<Contact, CoreError> {
        self.inner.repo.own_contact(&self.inner.ctx).await
    }

    pub async fn update_own_contact(
        &self,
        changes: &[(ContactAttribute, String)],
    ) -> Result<(), CoreError> {
        self.inner.repo.update_self(&self.inner.ctx, changes).await
    }

    // ── Group queries ────────────────────────────────────────────────

    pub async fn list_visible_groups(&self) -> Result<Vec<Group>, CoreError> {
        self.inner.repo.list_groups(Visibility::Visible).await
    }

    pub async fn list_hidden_groups(&self) -> Result<Vec<Group>, CoreError> {
        self.inner.repo.list_groups(Visibility::Hidden).await
    }

    // ── Visibility transitions ───────────────────────────────────────

    pub async fn hide_user(&self, identity: &str) -> Result<ToggleOutcome, CoreError> {
        self.toggler().hide_user(identity).await
    }

    pub async fn show_user(&self, identity: &str) -> Result<ToggleOutcome, CoreError> {
        self.toggler().show_user(identity).await
    }

    pub async fn hide_group(&self, identity: &str) -> Result<ToggleOutcome, CoreError> {
        self.toggler().hide_group(identity).await
    }

    pub async fn show_group(&self, identity: &str) -> Result<ToggleOutcome, CoreError> {
        self.toggler().show_group(identity).await
    }

    // ── Statistics ───────────────────────────────────────────────────

    /// Compute one statistic by its exposed name over the visible population.
    pub async fn get_statistic(&self, name: &str) -> Result<f64, CoreError> {
        let statistic: Statistic = name
            .parse()
            .map_err(|_| CoreError::InvalidStatistic { name: name.into() })?;
        let users = self.list_visible_users().await?;
        Ok(self.engine().value(statistic, &users))
    }

    /// Compute all ten statistics over one fresh population fetch. Any
    /// failure fails the whole batch.
    pub async fn get_all_statistics(&self) -> Result<StatisticsReport, CoreError> {
        let users = self.list_visible_users().await?;
        Ok(self.engine().report(&users))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn toggler(&self) -> VisibilityToggler<'_, D> {
        VisibilityToggler::new(
            self.inner.repo.directory(),
            self.inner.repo.config(),
            self.inner.repo.filters(),
        )
    }

    fn engine(&self) -> StatisticsEngine {
        StatisticsEngine::new(&self.inner.repo.settings().available_attributes())
    }
}

// ── Lifecycle over a real directory connection ───────────────────────

impl ContactService<LdapDirectory> {
    /// Connect to the configured directory endpoint, bind with the service
    /// credentials, and build the service.
    pub async fn connect(
        config: DirectoryConfig,
        settings: Arc<dyn SettingsProvider>,
        ctx: RequestContext,
    ) -> Result<Self, CoreError> {
        config.validate()?;

        let dir = LdapDirectory::connect(&config.host, config.port, &config.transport()).await?;
        dir.simple_bind(&config.bind_dn, &config.bind_password)
            .await?;
        info!(host = %config.host, "directory session established");

        Self::new(dir, config, settings, ctx)
    }

    /// Release the directory connection. Failures are logged, not fatal.
    pub async fn disconnect(&self) {
        if let Err(e) = self.inner.repo.directory().unbind().await {
            warn!(error = %e, "directory unbind failed (non-fatal)");
        }
        debug!("directory session released");
    }

    /// One-shot: connect, run the closure, disconnect.
    ///
    /// The connection is released on every exit path, including an erroring
    /// closure.
    pub async fn oneshot<F, Fut, T>(
        config: DirectoryConfig,
        settings: Arc<dyn SettingsProvider>,
        ctx: RequestContext,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(ContactService<LdapDirectory>) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let service = Self::connect(config, settings, ctx).await?;
        let result = f(service.clone()).await;
        service.disconnect().await;
        result
    }
}
