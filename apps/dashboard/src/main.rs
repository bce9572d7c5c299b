use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dashboard::cli::{Cli, Command};
use dashboard::dashboard::{ProfileSummary, Route, ViewState};
use dashboard::session::{FileSession, SessionProvider};
use dashboard::store::FirestoreStore;
use dashboard::upload::{HttpUploader, SelectedFile};
use dashboard::{Config, Dashboard, DashboardSettings, Submission};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    let level = if cli.verbose { "debug" } else { config.rust_log.as_str() };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level))
        }))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    info!("NERV dashboard v{}", env!("CARGO_PKG_VERSION"));

    let session = Arc::new(FileSession::load(&config.session_file).await?);
    let store = FirestoreStore::new(&config.firestore_base_url, &config.firebase_project_id)?
        .with_id_token(session.id_token().await);
    let uploader = HttpUploader::new(&config.resume_upload_url)?;
    info!(
        "Profile store: project {} at {}; uploads to {}",
        config.firebase_project_id,
        config.firestore_base_url,
        uploader.endpoint()
    );

    if session.current_user().await.is_none() {
        bail!(
            "Not signed in: no session at {}. Sign in through the web app first.",
            session.path().display()
        );
    }

    let dashboard = Dashboard::new(
        session,
        Arc::new(store),
        Arc::new(uploader),
        DashboardSettings {
            require_resume_for_interview: config.require_resume_for_interview,
        },
    );
    dashboard.mount().await;

    match cli.command {
        Command::Show => {
            let view = dashboard.view().await;
            if view.profile.is_none() {
                println!("No profile details found.");
            }
            println!("{}", ProfileSummary::from_view(&view));
        }
        Command::Edit(args) => {
            let outcome = dashboard.edit_profile(&args.edits()).await?;
            report(outcome, "Profile updated successfully!")?;
            println!("{}", dashboard.summary().await);
        }
        Command::ResumeLink { url } => {
            dashboard.set_resume_link(url).await;
            report(
                dashboard.submit_resume_link().await,
                "Resume link updated successfully!",
            )?;
        }
        Command::Upload { path } => {
            let file = SelectedFile::from_path(&path).await?;
            dashboard.select_file(file).await?;
            report(dashboard.upload_resume().await, "Resume uploaded successfully!")?;
            print_resume(&dashboard.view().await);
        }
        Command::Interview => match dashboard.start_interview().await {
            Route::Interview => println!("Starting interview..."),
            _ => bail!("Please add your resume before starting an interview."),
        },
        Command::Logout => {
            report(dashboard.logout().await, "Signed out.")?;
            if dashboard.view().await.route == Route::Login {
                println!("Sign in again through the web app to continue.");
            }
        }
    }

    Ok(())
}

fn report(outcome: Submission, success: &str) -> Result<()> {
    match outcome {
        Submission::Succeeded => {
            println!("{success}");
            Ok(())
        }
        Submission::Failed(message) => bail!(message),
        Submission::Skipped => bail!("Nothing to do."),
    }
}

fn print_resume(view: &ViewState) {
    if let Some(profile) = &view.profile {
        if let Some(url) = &profile.resume_url {
            match &profile.resume_name {
                Some(name) => println!("View Resume ({name}): {url}"),
                None => println!("View Resume: {url}"),
            }
        }
    }
}
