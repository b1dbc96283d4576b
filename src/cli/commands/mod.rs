pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TOKEN: &str = "token";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_MENU_TTL: &str = "menu-ttl";
pub const ARG_PERMISSIONS_TTL: &str = "permissions-ttl";
pub const ARG_JSON: &str = "json";
pub const ARG_SECTION: &str = "section";
pub const ARG_SUBSECTION: &str = "subsection";
pub const ARG_URL: &str = "url";

pub const CMD_MENU: &str = "menu";
pub const CMD_PERMISSIONS: &str = "permissions";
pub const CMD_SIDEBAR: &str = "sidebar";
pub const CMD_CATALOG: &str = "catalog";

fn json_arg() -> Arg {
    Arg::new(ARG_JSON)
        .long("json")
        .help("Print the result as JSON")
        .action(ArgAction::SetTrue)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("cotizaciones")
        .about("Navigation menu and permission client for the quotations console")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the access backend")
                .default_value("http://localhost:3998/")
                .env("COTIZACIONES_API_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TOKEN)
                .long(ARG_TOKEN)
                .help("Bearer token issued by the SSO provider")
                .env("COTIZACIONES_TOKEN")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .default_value("10")
                .env("COTIZACIONES_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_MENU_TTL)
                .long(ARG_MENU_TTL)
                .help("Menu cache lifetime in seconds")
                .default_value("600")
                .env("COTIZACIONES_MENU_TTL")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_PERMISSIONS_TTL)
                .long(ARG_PERMISSIONS_TTL)
                .help("Permission cache lifetime in seconds")
                .default_value("300")
                .env("COTIZACIONES_PERMISSIONS_TTL")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .subcommand(
            Command::new(CMD_MENU)
                .about("Fetch and print the navigation tree")
                .arg(json_arg()),
        )
        .subcommand(
            Command::new(CMD_PERMISSIONS)
                .about("Resolve module permissions for a section/subsection pair")
                .arg(
                    Arg::new(ARG_SECTION)
                        .long(ARG_SECTION)
                        .short('s')
                        .help("Section code, e.g. COTIZAR")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_SUBSECTION)
                        .long(ARG_SUBSECTION)
                        .short('u')
                        .help("Subsection code, e.g. DETALLE")
                        .required(true),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new(CMD_SIDEBAR)
                .about("Show which menu branch a route expands")
                .arg(
                    Arg::new(ARG_URL)
                        .help("Route to match, e.g. /cotizaciones/consulta")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_CATALOG)
                .about("Print the static navigation catalog")
                .arg(json_arg()),
        );

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "cotizaciones");
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
        let subcommands: Vec<&str> = command.get_subcommands().map(Command::get_name).collect();
        assert_eq!(subcommands, vec!["menu", "permissions", "sidebar", "catalog"]);
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("COTIZACIONES_API_URL", None::<&str>),
                ("COTIZACIONES_TOKEN", None::<&str>),
                ("COTIZACIONES_TIMEOUT", None::<&str>),
                ("COTIZACIONES_MENU_TTL", None::<&str>),
                ("COTIZACIONES_PERMISSIONS_TTL", None::<&str>),
            ],
            || {
                let matches = new().get_matches_from(vec!["cotizaciones", "menu"]);
                assert_eq!(
                    matches.get_one::<String>(ARG_API_URL).cloned(),
                    Some("http://localhost:3998/".to_string())
                );
                assert_eq!(matches.get_one::<String>(ARG_TOKEN), None);
                assert_eq!(matches.get_one::<u64>(ARG_TIMEOUT).copied(), Some(10));
                assert_eq!(matches.get_one::<u64>(ARG_MENU_TTL).copied(), Some(600));
                assert_eq!(matches.get_one::<u64>(ARG_PERMISSIONS_TTL).copied(), Some(300));
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("COTIZACIONES_API_URL", Some("https://acceso.example.com/")),
                ("COTIZACIONES_TOKEN", Some("abc.def.ghi")),
                ("COTIZACIONES_TIMEOUT", Some("3")),
                ("COTIZACIONES_MENU_TTL", Some("60")),
                ("COTIZACIONES_PERMISSIONS_TTL", Some("30")),
                ("COTIZACIONES_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["cotizaciones", "catalog"]);
                assert_eq!(
                    matches.get_one::<String>(ARG_API_URL).cloned(),
                    Some("https://acceso.example.com/".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_TOKEN).cloned(),
                    Some("abc.def.ghi".to_string())
                );
                assert_eq!(matches.get_one::<u64>(ARG_TIMEOUT).copied(), Some(3));
                assert_eq!(matches.get_one::<u64>(ARG_MENU_TTL).copied(), Some(60));
                assert_eq!(matches.get_one::<u64>(ARG_PERMISSIONS_TTL).copied(), Some(30));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("COTIZACIONES_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["cotizaciones", "catalog"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars([("COTIZACIONES_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["cotizaciones".to_string(), "catalog".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_permissions_requires_codes() {
        let result = new().try_get_matches_from(vec!["cotizaciones", "permissions", "-s", "COTIZAR"]);
        assert_eq!(
            result.map_err(|e| e.kind()),
            Err(clap::error::ErrorKind::MissingRequiredArgument)
        );

        let matches = new().get_matches_from(vec![
            "cotizaciones",
            "permissions",
            "--section",
            "COTIZAR",
            "--subsection",
            "DETALLE",
            "--json",
        ]);
        let Some((name, sub)) = matches.subcommand() else {
            panic!("expected a subcommand");
        };
        assert_eq!(name, CMD_PERMISSIONS);
        assert_eq!(sub.get_one::<String>(ARG_SECTION).map(String::as_str), Some("COTIZAR"));
        assert!(sub.get_flag(ARG_JSON));
    }

    #[test]
    fn test_invalid_timeout_fails() {
        let result = new().try_get_matches_from(vec!["cotizaciones", "--timeout", "0", "menu"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_required() {
        let result = new().try_get_matches_from(vec!["cotizaciones"]);
        assert!(result.is_err());
    }
}
