#![allow(clippy::module_name_repetitions)]

//! Interactive menu for browsing the portal without memorizing flags.

use course_portal::route::Route;
use course_portal::search::ResourceFilter;
use course_portal::view::ViewOptions;
use course_portal_catalog_models::Module;
use dialoguer::{Input, Select};

use crate::commands;
use crate::session::{Session, feed_source};

/// Top-level actions available in the menu.
enum PortalAction {
    Home,
    BrowseModules,
    Search,
    Sync,
    About,
    ClearCache,
    Quit,
}

impl PortalAction {
    const ALL: &[Self] = &[
        Self::Home,
        Self::BrowseModules,
        Self::Search,
        Self::Sync,
        Self::About,
        Self::ClearCache,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home (recent files)",
            Self::BrowseModules => "Browse modules",
            Self::Search => "Search files",
            Self::Sync => "Sync now",
            Self::About => "About",
            Self::ClearCache => "Clear local cache",
            Self::Quit => "Quit",
        }
    }
}

/// What to do with a selected module's file.
enum FileAction {
    Download,
    Share,
    Back,
}

impl FileAction {
    const ALL: &[Self] = &[Self::Download, Self::Share, Self::Back];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Download => "Download a file",
            Self::Share => "Share this module",
            Self::Back => "Back",
        }
    }
}

/// Runs the menu loop until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal prompt fails or a selected operation
/// fails.
pub async fn run(mut session: Session, offline: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("Course Portal");
    println!();

    if !offline {
        session.refresh().await;
    }

    let labels: Vec<&str> = PortalAction::ALL.iter().map(PortalAction::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match PortalAction::ALL[idx] {
            PortalAction::Home => commands::view(&session, &Route::Home, &ViewOptions::default()),
            PortalAction::BrowseModules => browse_modules(&session).await?,
            PortalAction::Search => search(&session)?,
            PortalAction::Sync => sync(&mut session).await?,
            PortalAction::About => commands::view(&session, &Route::About, &ViewOptions::default()),
            PortalAction::ClearCache => commands::clear_cache(&session)?,
            PortalAction::Quit => break,
        }
        println!();
    }

    Ok(())
}

fn module_label(module: &Module) -> String {
    format!("{:<8} {} ({} files)", module.code, module.name, module.resources.len())
}

/// Lets the user pick a module, shows it, then offers file actions.
async fn browse_modules(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let modules = session.portal.modules();
    if modules.is_empty() {
        println!("No modules yet. Try syncing first.");
        return Ok(());
    }

    let labels: Vec<String> = modules.iter().map(module_label).collect();
    let idx = Select::new()
        .with_prompt("Select a module")
        .items(&labels)
        .max_length(15)
        .interact()?;
    let module = &modules[idx];

    let filter_labels: Vec<String> = ResourceFilter::ALL.iter().map(ToString::to_string).collect();
    let filter_idx = Select::new()
        .with_prompt("Show")
        .items(&filter_labels)
        .default(0)
        .interact()?;
    let options = ViewOptions {
        query: String::new(),
        filter: ResourceFilter::ALL[filter_idx],
    };
    commands::view(session, &Route::Module(module.id.clone()), &options);

    let action_labels: Vec<&str> = FileAction::ALL.iter().map(FileAction::label).collect();
    let action = Select::new()
        .with_prompt("Next")
        .items(&action_labels)
        .default(0)
        .interact()?;

    match FileAction::ALL[action] {
        FileAction::Download => {
            let file_labels: Vec<String> = module
                .resources
                .iter()
                .map(|r| format!("{} {} ({})", r.id, r.title, r.resource_type))
                .collect();
            let file_idx = Select::new()
                .with_prompt("Select a file")
                .items(&file_labels)
                .max_length(15)
                .interact()?;
            let resource_id = &module.resources[file_idx].id;
            if let Err(e) = commands::download(session, &module.id, resource_id).await {
                println!("{e}");
            }
        }
        FileAction::Share => commands::share(session, &module.id)?,
        FileAction::Back => {}
    }

    Ok(())
}

fn search(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let query: String = Input::new()
        .with_prompt("Search for")
        .allow_empty(true)
        .interact_text()?;
    commands::search(session, query.trim(), ResourceFilter::All);
    Ok(())
}

async fn sync(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let default_url = session.config.feed_url.clone().unwrap_or_default();
    let url: String = Input::new()
        .with_prompt("Feed URL")
        .with_initial_text(default_url)
        .allow_empty(true)
        .interact_text()?;

    let url = Some(url.trim()).filter(|u| !u.is_empty());
    let Some(source) = feed_source(None, url, &session.config)? else {
        println!("No feed URL given.");
        return Ok(());
    };

    if let Err(e) = session.sync(source.as_ref()).await {
        println!("{e}");
    }
    Ok(())
}
