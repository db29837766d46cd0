#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Error;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ApiError;
use crate::domain::models::Cart;
use crate::domain::models::MenuItem;
use crate::domain::models::MenuItemUpdate;
use crate::domain::models::NewMenuItem;
use crate::domain::models::OrderConfirmation;
use crate::domain::models::RestaurantApi;
use crate::domain::services::Ordering;
use crate::infrastructure::api::HttpApi;
use crate::infrastructure::storage::TokenCache;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Parses `<id>` or `<id>:<quantity>` as given to `order --item`.
pub fn parse_order_item(text: &str) -> Result<(i64, i64), String> {
    let (id, quantity) = match text.split_once(':') {
        Some((id, quantity)) => (id, quantity),
        None => (text, "1"),
    };

    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| return format!("'{id}' is not a menu item id"))?;
    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|_| return format!("'{quantity}' is not a quantity"))?;

    if quantity <= 0 {
        return Err("Quantity must be at least 1".to_string());
    }

    return Ok((id, quantity));
}

pub fn format_menu_item(item: &MenuItem) -> String {
    let mut res = format!(
        "- (ID: {}) {} [{}] ${:.2}",
        item.id, item.name, item.category, item.price
    );

    if !item.is_available {
        res = format!("{res} (unavailable)");
    }

    return res;
}

pub fn format_cart(cart: &Cart) -> String {
    let mut lines = cart
        .lines()
        .iter()
        .map(|line| {
            return format!(
                "- {} x {} ${:.2}",
                line.name,
                line.quantity,
                line.subtotal()
            );
        })
        .collect::<Vec<String>>();

    lines.push(format!("Total: ${:.2}", cart.total()));

    return lines.join("\n");
}

pub fn format_order(order: &OrderConfirmation) -> String {
    let mut lines = vec![format!("Order #{} ({})", order.id, order.created_at)];
    for item in order.items.iter() {
        lines.push(format!(
            "  - {} x item {} @ ${:.2}",
            item.quantity, item.menu_item_id, item.unit_price
        ));
    }
    lines.push(format!("  Total: ${:.2}", order.total_amount));

    return lines.join("\n");
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_login() -> Command {
    return Command::new("login")
        .about("Log in and store the session token for later commands.")
        .arg(
            Arg::new("username")
                .short('u')
                .long("username")
                .env("BISTRO_USERNAME")
                .num_args(1)
                .required(true)
                .help("Account username."),
        )
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .env("BISTRO_PASSWORD")
                .hide_env_values(true)
                .num_args(1)
                .required(true)
                .help("Account password."),
        );
}

fn arg_menu_id() -> Arg {
    return Arg::new("id")
        .short('i')
        .long("id")
        .num_args(1)
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Menu item ID.");
}

fn subcommand_menu() -> Command {
    return Command::new("menu")
        .about("Browse and manage the menu.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List menu items that can be ordered.")
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Include unavailable items."),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Add a menu item. Requires an admin account.")
                .arg(Arg::new("name").long("name").num_args(1).required(true).help("Item name."))
                .arg(
                    Arg::new("price")
                        .long("price")
                        .num_args(1)
                        .required(true)
                        .value_parser(value_parser!(f64))
                        .help("Item price."),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .num_args(1)
                        .required(true)
                        .help("Item category."),
                )
                .arg(
                    Arg::new("unavailable")
                        .long("unavailable")
                        .action(ArgAction::SetTrue)
                        .help("Add the item without making it orderable."),
                ),
        )
        .subcommand(
            Command::new("update")
                .about("Update fields of a menu item. Fields that are not passed are left unchanged. Requires an admin account.")
                .arg(arg_menu_id())
                .arg(Arg::new("name").long("name").num_args(1).help("New name."))
                .arg(
                    Arg::new("price")
                        .long("price")
                        .num_args(1)
                        .value_parser(value_parser!(f64))
                        .help("New price."),
                )
                .arg(Arg::new("category").long("category").num_args(1).help("New category."))
                .arg(
                    Arg::new("available")
                        .long("available")
                        .num_args(1)
                        .value_parser(value_parser!(bool))
                        .help("Whether the item can be ordered."),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a menu item. Requires an admin account.")
                .arg(arg_menu_id()),
        );
}

fn subcommand_order() -> Command {
    return Command::new("order")
        .about("Place an order from the menu.")
        .arg(
            Arg::new("item")
                .long("item")
                .action(ArgAction::Append)
                .required(true)
                .value_parser(parse_order_item)
                .help("Menu item to order as <id> or <id>:<quantity>. Repeat for more items."),
        );
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("bistro")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_login())
        .subcommand(Command::new("logout").about("Forget the stored session token."))
        .subcommand(subcommand_menu())
        .subcommand(subcommand_order())
        .subcommand(Command::new("orders").about("List past orders."))
        .arg(
            Arg::new(ConfigKey::ApiURL.as_str())
                .long(ConfigKey::ApiURL.as_str())
                .env("BISTRO_API_URL")
                .num_args(1)
                .help(format!("Restaurant API base URL. [default: {}]", Config::default(ConfigKey::ApiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.as_str())
                .short('c')
                .long(ConfigKey::ConfigFile.as_str())
                .env("BISTRO_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::RequestTimeout.as_str())
                .long(ConfigKey::RequestTimeout.as_str())
                .env("BISTRO_REQUEST_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds for an API response. [default: {}]", Config::default(ConfigKey::RequestTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::TokenFile.as_str())
                .long(ConfigKey::TokenFile.as_str())
                .env("BISTRO_TOKEN_FILE")
                .num_args(1)
                .help(format!("File the session token is stored in between commands. [default: {}]", Config::default(ConfigKey::TokenFile)))
                .global(true),
        );
}

async fn run_menu(api: &HttpApi, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", list_matches)) => {
            let mut ordering = Ordering::default();
            ordering.load_menu(api).await?;

            let items = if list_matches.get_flag("all") {
                ordering.menu.iter().collect::<Vec<&MenuItem>>()
            } else {
                ordering.available()
            };

            if items.is_empty() {
                println!("The menu is empty.");
            } else {
                let lines = items
                    .iter()
                    .map(|item| return format_menu_item(item))
                    .collect::<Vec<String>>();
                println!("{}", lines.join("\n"));
            }
        }
        Some(("add", add_matches)) => {
            let item = NewMenuItem {
                name: add_matches
                    .get_one::<String>("name")
                    .cloned()
                    .unwrap_or_default(),
                price: add_matches.get_one::<f64>("price").copied().unwrap_or_default(),
                category: add_matches
                    .get_one::<String>("category")
                    .cloned()
                    .unwrap_or_default(),
                is_available: !add_matches.get_flag("unavailable"),
            };

            let created = api.add_menu_item(&item).await?;
            println!("Added {}", format_menu_item(&created));
        }
        Some(("update", update_matches)) => {
            let id = update_matches.get_one::<i64>("id").copied().unwrap_or_default();
            let update = MenuItemUpdate {
                name: update_matches.get_one::<String>("name").cloned(),
                price: update_matches.get_one::<f64>("price").copied(),
                category: update_matches.get_one::<String>("category").cloned(),
                is_available: update_matches.get_one::<bool>("available").copied(),
            };

            if update.is_empty() {
                bail!("Nothing to update. Pass at least one of --name, --price, --category or --available.");
            }

            let updated = api.update_menu_item(id, &update).await?;
            println!("Updated {}", format_menu_item(&updated));
        }
        Some(("delete", delete_matches)) => {
            let id = delete_matches.get_one::<i64>("id").copied().unwrap_or_default();
            api.delete_menu_item(id).await?;
            println!("Deleted menu item {id}");
        }
        _ => {
            subcommand_menu().print_long_help()?;
        }
    }

    return Ok(());
}

async fn run_order(api: &HttpApi, matches: &ArgMatches) -> Result<()> {
    let mut ordering = Ordering::default();
    ordering.load_menu(api).await?;

    if let Some(items) = matches.get_many::<(i64, i64)>("item") {
        for (menu_item_id, quantity) in items {
            ordering.add_to_order(*menu_item_id, *quantity)?;
        }
    }

    println!("{}", format_cart(&ordering.cart));

    let confirmation = ordering.submit(api).await?;
    println!("\n{}", Paint::green("Order placed successfully!"));
    println!("{}", format_order(&confirmation));

    return Ok(());
}

async fn run(api: &HttpApi, cache: &TokenCache, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("login", login_matches)) => {
            let username = login_matches
                .get_one::<String>("username")
                .cloned()
                .unwrap_or_default();
            let password = login_matches
                .get_one::<String>("password")
                .cloned()
                .unwrap_or_default();

            api.login(&username, &password).await?;
            cache.save(api.session()).await?;
            println!("Logged in as {username}");
        }
        Some(("logout", _)) => {
            api.session().clear();
            cache.remove().await?;
            println!("Logged out");
        }
        Some(("menu", menu_matches)) => {
            run_menu(api, menu_matches).await?;
        }
        Some(("order", order_matches)) => {
            run_order(api, order_matches).await?;
        }
        Some(("orders", _)) => {
            let orders = api.list_orders().await?;
            if orders.is_empty() {
                println!("There are no orders yet.");
            } else {
                let lines = orders
                    .iter()
                    .map(|order| return format_order(order))
                    .collect::<Vec<String>>();
                println!("{}", lines.join("\n\n"));
            }
        }
        _ => {
            build().print_long_help()?;
        }
    }

    return Ok(());
}

fn matches_chain(matches: &ArgMatches) -> Vec<&ArgMatches> {
    let mut chain = vec![matches];
    let mut current = matches;
    while let Some((_, sub_matches)) = current.subcommand() {
        chain.push(sub_matches);
        current = sub_matches;
    }

    return chain;
}

/// Drops the stored token when `err` is an authentication failure and turns
/// it into a prompt to log in again. Other errors pass through unchanged.
pub async fn handle_auth_error(cache: &TokenCache, err: Error) -> Error {
    let is_auth = err
        .downcast_ref::<ApiError>()
        .map_or(false, |api_err| return api_err.is_auth());
    if !is_auth {
        return err;
    }

    if let Err(remove_err) = cache.remove().await {
        tracing::error!(
            error = ?remove_err,
            path = ?cache.file_path,
            "Failed to remove session token"
        );
    }

    return anyhow!("{err}\nPlease log in again with `bistro login`.");
}

pub async fn parse() -> Result<()> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(());
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(());
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(());
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(());
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(());
            }
        },
        _ => {}
    }

    Config::load(matches_chain(&matches)).await?;

    let cache = TokenCache::default();
    let session = cache.load().await?;
    let api = HttpApi::from_config(session)?;

    if let Err(err) = run(&api, &cache, &matches).await {
        return Err(handle_auth_error(&cache, err).await);
    }

    return Ok(());
}
