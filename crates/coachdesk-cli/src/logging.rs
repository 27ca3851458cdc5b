use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `COACHDESK_LOG=coachdesk_client=debug`.
pub const LOG_ENV: &str = "COACHDESK_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber. Logs go to stderr so stdout stays
/// parseable in `--json` mode.
pub fn init(json: bool) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
