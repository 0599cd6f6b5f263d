use clap::{Parser, Subcommand, ValueEnum};

/// Incremental TV show search: caching proxy and interactive client.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Log output format
    #[arg(long, value_enum, default_value_t = TracingFormat::default(), global = true)]
    pub tracing: TracingFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the caching search proxy (default)
    Serve,
    /// Search interactively; each stdin line is the current search box text
    Search,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable, colored output
    Pretty,
    /// One JSON object per line
    Json,
}

impl Default for TracingFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            TracingFormat::Pretty
        } else {
            TracingFormat::Json
        }
    }
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let args = Args::try_parse_from(["showsearch"]).unwrap();
        assert_eq!(args.command(), Command::Serve);
    }

    #[test]
    fn tracing_flag_is_global() {
        let args = Args::try_parse_from(["showsearch", "search", "--tracing", "json"]).unwrap();
        assert_eq!(args.command(), Command::Search);
        assert_eq!(args.tracing, TracingFormat::Json);
    }
}
