use anyhow::Context;
use clap::Parser;
use learning_catalog::config::{CliConfig, Command, ThemeAction};
use learning_catalog::core::export::export_cart_csv;
use learning_catalog::core::session::{GroupAddReport, ModuleListing, Selection, Session};
use learning_catalog::core::{ConfigProvider, KeyValueStore, ModuleGroup, ModuleKey, Theme};
use learning_catalog::utils::{logger, validation::Validate};
use learning_catalog::{catalog_source_for, compute_totals, CatalogLoader, FileStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_logger(config.log_format(), cli.verbose || config.verbose());
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = FileStore::new(config.data_dir());
    let mut session = Session::restore(storage, config.namespace());
    session.subscribe(|state| {
        let totals = compute_totals(state);
        tracing::debug!(
            "Cart now holds {} modules, {} hours",
            totals.item_count,
            totals.total_hours
        );
    });

    if cli.command.needs_catalog() {
        let source = catalog_source_for(config.catalog_source());
        let result = CatalogLoader::load(source.as_ref()).await;
        session.finish_loading(result);
    }

    let outcome = run_command(&mut session, &cli.command);

    for notice in session.take_notices() {
        eprintln!("⚠️  {}", notice);
    }

    outcome
}

fn run_command<S: KeyValueStore>(session: &mut Session<S>, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Modules {
            tech,
            search,
            difficulty,
        } => {
            session.select_technology(*tech);
            session.set_search(search.clone());
            session.set_difficulty(*difficulty);
            print_listing(session.visible_modules());
        }
        Command::Show { tech, id } => {
            let key = ModuleKey::new(*tech, id.clone());
            match session.find_module(&key) {
                Some(module) => {
                    println!("{} ({})", module.title, key);
                    println!("  {}", module.summary);
                    println!("  difficulty: {}, {} hours", module.difficulty, module.hours);
                    println!("  page: {}", module.resource_locator);
                    if !module.prerequisites.is_empty() {
                        println!("  prerequisites: {}", module.prerequisites.join(", "));
                    }
                    let marker = if session.is_selected(&key) { "yes" } else { "no" };
                    println!("  in cart: {}", marker);
                }
                None => println!("No module {} in the catalog", key),
            }
        }
        Command::Add { tech, id } => {
            let key = ModuleKey::new(*tech, id.clone());
            report_selection(&key, session.add(&key));
            print_totals(session);
        }
        Command::Remove { tech, id } => {
            let key = ModuleKey::new(*tech, id.clone());
            report_selection(&key, session.remove(&key));
            print_totals(session);
        }
        Command::Toggle { tech, id } => {
            let key = ModuleKey::new(*tech, id.clone());
            report_selection(&key, session.toggle(&key));
            print_totals(session);
        }
        Command::Clear => {
            session.clear_cart();
            println!("🗑️  Cart cleared");
        }
        Command::Cart => print_cart(session),
        Command::Paths => match session.catalog() {
            Some(catalog) => print_groups(catalog.learning_paths()),
            None => println!("Learning paths are unavailable without a catalog"),
        },
        Command::Projects => match session.catalog() {
            Some(catalog) => print_groups(catalog.project_examples()),
            None => println!("Project examples are unavailable without a catalog"),
        },
        Command::AddPath { id } => {
            report_group(id, session.add_learning_path(id));
            print_totals(session);
        }
        Command::AddProject { id } => {
            report_group(id, session.add_project_example(id));
            print_totals(session);
        }
        Command::Export { path } => {
            let cart = session.cart();
            export_cart_csv(&cart, path)
                .with_context(|| format!("failed to export cart to {}", path.display()))?;
            println!("📁 Exported {} modules to {}", cart.len(), path.display());
        }
        Command::Theme { action } => {
            let theme = match action {
                None => session.theme(),
                Some(ThemeAction::Toggle) => session.toggle_theme(),
                Some(ThemeAction::Light) => {
                    session.set_theme(Theme::Light);
                    session.theme()
                }
                Some(ThemeAction::Dark) => {
                    session.set_theme(Theme::Dark);
                    session.theme()
                }
            };
            println!("Theme: {}", theme.as_str());
        }
    }
    Ok(())
}

fn print_listing(listing: ModuleListing) {
    match listing {
        ModuleListing::Loading => println!("Catalog not loaded"),
        ModuleListing::Unavailable => println!("Catalog unavailable"),
        ModuleListing::Ready(modules) if modules.is_empty() => println!("No modules match"),
        ModuleListing::Ready(modules) => {
            for module in modules {
                println!(
                    "{:<20} {:<13} {:>3}h  {}",
                    module.identifier, module.difficulty, module.hours, module.title
                );
            }
        }
    }
}

fn print_cart<S: KeyValueStore>(session: &Session<S>) {
    let cart = session.cart();
    if cart.is_empty() {
        println!("Your cart is empty");
    }
    for entry in &cart {
        println!(
            "{:<11} {:<20} {:>3}h  {}",
            entry.technology, entry.identifier, entry.hours, entry.title
        );
    }
    print_totals(session);
}

fn print_totals<S: KeyValueStore>(session: &Session<S>) {
    let totals = session.totals();
    println!(
        "📊 {} modules, {} hours in total",
        totals.item_count, totals.total_hours
    );
}

fn print_groups(groups: &[ModuleGroup]) {
    if groups.is_empty() {
        println!("None defined");
    }
    for group in groups {
        println!("{:<20} [{}] {}", group.identifier, group.technology, group.name);
        if !group.description.is_empty() {
            println!("  {}", group.description);
        }
        println!("  modules: {}", group.modules.join(", "));
    }
}

fn report_selection(key: &ModuleKey, selection: Selection) {
    match selection {
        Selection::Added => println!("✅ Added {}", key),
        Selection::Removed => println!("➖ Removed {}", key),
        Selection::Unchanged => println!("No change for {}", key),
        Selection::UnknownModule => println!("No module {} in the catalog", key),
    }
}

fn report_group(id: &str, report: Option<GroupAddReport>) {
    match report {
        Some(report) => {
            println!(
                "✅ Added {} modules from '{}' ({} already selected)",
                report.added, report.group, report.already_selected
            );
            if !report.unknown.is_empty() {
                println!("  skipped unknown modules: {}", report.unknown.join(", "));
            }
        }
        None => println!("No group '{}' in the catalog", id),
    }
}
