//! CLI command implementations

use anyhow::Result;
use dialoguer::{Input, Password};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::auth::{FileTokenStore, SessionManager, TokenStore, User};
use crate::cli::{
    error, info, print_approval, print_badge, print_driver_detail, print_driver_table,
    print_verification, spinner, success, warn, DriversAction, OutputFormat,
};
use crate::config::{self, Config};
use crate::dashboard::{DashboardView, RefreshPolicy, Tab, UserBadge};
use crate::driver::{Driver, DriverId};
use crate::error::Error;
use crate::gateway::BackendGateway;
use crate::guard::{GuardDecision, RouteGuard};
use crate::lifecycle::Completion;
use crate::login::{LoginForm, LoginView};
use crate::navigation::{Navigator, Route};
use crate::verification::SimulatedVerifier;

/// Everything a command needs, wired from configuration
struct Console {
    config: Config,
    session: SessionManager,
    gateway: BackendGateway,
}

impl Console {
    fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = config::load_config_or_default(config_path)?;
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(
            config.storage.path.clone(),
            config.storage.token_key.clone(),
        ));
        let session = SessionManager::restore(Arc::clone(&store));
        let gateway = BackendGateway::new(config.api.clone(), store)?;

        Ok(Self {
            config,
            session,
            gateway,
        })
    }

    /// Pass the route guard for the dashboard
    async fn require_user(&self) -> Result<User> {
        let mut navigator = Navigator::new(Route::Dashboard);
        let mut guard = RouteGuard::new(self.session.clone());

        match guard.enter(&mut navigator).await {
            GuardDecision::Render(user) => Ok(user),
            GuardDecision::Wait | GuardDecision::Redirect(_) => {
                error(&Error::Unauthorized.to_string());
                Err(Error::Unauthorized.into())
            }
        }
    }

    fn dashboard(&self) -> DashboardView {
        let provider = Arc::new(SimulatedVerifier::new(self.config.verification.delay()));
        DashboardView::new(
            self.gateway.clone(),
            self.session.clone(),
            provider,
            RefreshPolicy::from_config(self.config.verification.refresh_on_failure),
        )
    }

    /// Mount the dashboard and select a driver
    async fn dashboard_with(&self, id: &str) -> Result<(DashboardView, Driver)> {
        self.require_user().await?;
        let dashboard = self.dashboard();
        load(&dashboard).await;

        match dashboard.select(&DriverId::from(id)).await {
            Ok(driver) => Ok((dashboard, driver)),
            Err(e) => {
                error(&e.to_string());
                Err(e.into())
            }
        }
    }
}

async fn load(dashboard: &DashboardView) {
    if let Completion::Applied(Err(e)) = dashboard.mount().await {
        warn(&format!("Could not load drivers: {}", e));
    }
}

/// Initialize a new driver-admin.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(config::loader::CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", config::loader::CONFIG_FILENAME));
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success(&format!("Created {}", config::loader::CONFIG_FILENAME));
    info("Edit the service URLs and run 'driver-admin login' to sign in");

    Ok(())
}

/// Log in as an administrator
pub async fn login(
    config_path: Option<PathBuf>,
    username: Option<String>,
    password: Option<String>,
    remember_me: bool,
) -> Result<()> {
    let console = Console::open(config_path.as_deref())?;

    let username = match username {
        Some(username) => username,
        None => Input::<String>::new()
            .with_prompt("Username")
            .allow_empty(true)
            .interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?,
    };

    let form = LoginForm {
        username,
        password,
        remember_me,
    };

    let mut view = LoginView::new(console.gateway.clone(), console.session.clone());
    let mut navigator = Navigator::new(Route::Login);

    let bar = spinner("Authenticating...");
    let outcome = view.submit(&form, &mut navigator).await;
    bar.finish_and_clear();

    match outcome {
        Completion::Applied(Ok(user)) => {
            success(&format!(
                "Signed in as {}",
                user.username.as_deref().unwrap_or(user.display_name())
            ));
            tracing::debug!("Now at {}", navigator.current());
            Ok(())
        }
        Completion::Applied(Err(e)) => {
            error(view.error().unwrap_or(crate::error::GENERIC_LOGIN_ERROR));
            Err(e.into())
        }
        Completion::Discarded => Ok(()),
    }
}

/// Log out
pub async fn logout(config_path: Option<PathBuf>) -> Result<()> {
    let console = Console::open(config_path.as_deref())?;
    console.session.logout()?;
    success("Signed out");
    Ok(())
}

/// Show the logged in administrator
pub async fn whoami(config_path: Option<PathBuf>) -> Result<()> {
    let console = Console::open(config_path.as_deref())?;
    let user = console.require_user().await?;

    print_badge(&UserBadge::from(&user));
    if let Some(id) = user.identifier() {
        info(&format!("User ID: {}", id));
    }
    let roles = user.all_roles();
    if !roles.is_empty() {
        info(&format!("Roles: {}", roles.join(", ")));
    }
    if user.is_expired() {
        warn("The stored token has expired; the server may reject requests");
    }

    Ok(())
}

/// Driver review commands
pub async fn drivers(config_path: Option<PathBuf>, action: DriversAction) -> Result<()> {
    let console = Console::open(config_path.as_deref())?;

    match action {
        DriversAction::List {
            tab,
            search,
            format,
        } => list(&console, tab, search, format).await,
        DriversAction::Verify { id } => verify(&console, &id).await,
        DriversAction::Approve { id } => approve(&console, &id).await,
        DriversAction::Reject { id } => reject(&console, &id).await,
    }
}

async fn list(console: &Console, tab: Tab, search: String, format: OutputFormat) -> Result<()> {
    console.require_user().await?;

    let dashboard = console.dashboard();
    load(&dashboard).await;
    dashboard.set_tab(tab).await;
    dashboard.set_query(search).await;

    let drivers = dashboard.filtered().await;

    match format {
        OutputFormat::Table => {
            if let Some(badge) = dashboard.badge() {
                print_badge(&badge);
            }
            print_driver_table(&drivers);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&drivers)?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&drivers)?;
            println!("{}", yaml);
        }
    }

    Ok(())
}

async fn verify(console: &Console, id: &str) -> Result<()> {
    let (dashboard, driver) = console.dashboard_with(id).await?;
    print_driver_detail(&driver);

    let bar = spinner("Running document verification...");
    let outcome = dashboard.run_verification().await;
    bar.finish_and_clear();

    match outcome {
        Completion::Applied(Ok(result)) => {
            print_verification(&result);
            Ok(())
        }
        Completion::Applied(Err(e)) => {
            error(&format!("Verification failed: {}", e));
            Err(e.into())
        }
        Completion::Discarded => Ok(()),
    }
}

async fn approve(console: &Console, id: &str) -> Result<()> {
    let (dashboard, driver) = console.dashboard_with(id).await?;
    info(&format!(
        "Approving {}",
        driver.full_name.as_deref().unwrap_or("driver")
    ));

    let bar = spinner("Approving...");
    let outcome = dashboard.approve().await;
    bar.finish_and_clear();

    match outcome {
        Completion::Applied(Ok(outcome)) => {
            print_approval(&outcome);
            Ok(())
        }
        Completion::Applied(Err(e)) => {
            error(&e.to_string());
            Err(e.into())
        }
        Completion::Discarded => Ok(()),
    }
}

async fn reject(console: &Console, id: &str) -> Result<()> {
    let (dashboard, _driver) = console.dashboard_with(id).await?;
    let notice = dashboard.reject().await?;
    warn(notice);
    Ok(())
}
