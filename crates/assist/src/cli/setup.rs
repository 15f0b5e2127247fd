use assistapp::analytics::Month;
use assistapp::codec::{DATETIME_FORMAT, DATE_FORMAT};
use assistapp::commands::life::LifeEntry;
use assistapp::commands::payments::PaymentCriteria;
use assistapp::model::{HealthPatch, PaymentKind};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "assist",
    bin_name = "assist",
    version,
    disable_help_subcommand = true,
    about = "Plain-text personal assistant: tasks, health, life log and payments",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the record files
    #[arg(short, long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Configuration file to load before the others
    #[arg(short, long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help_heading = "Options"
    )]
    pub output: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// To-do list
    #[command(subcommand, display_order = 1)]
    Task(TaskCommands),

    /// Health measurements
    #[command(subcommand, display_order = 2)]
    Health(HealthCommands),

    /// Life log
    #[command(subcommand, display_order = 3)]
    Life(LifeCommands),

    /// Payments ledger and analysis
    #[command(subcommand, display_order = 4)]
    Pay(PayCommands),

    /// Inspect configuration
    #[command(subcommand, display_order = 5)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task
    #[command(alias = "a")]
    Add {
        content: String,

        /// 1 (low) to 3 (high)
        #[arg(short, long)]
        priority: Option<u8>,
    },

    /// List tasks, highest priority first
    #[command(alias = "ls")]
    List {
        /// Only tasks not yet done
        #[arg(long)]
        pending: bool,
    },

    /// Mark tasks as done
    Done {
        /// Positions (e.g. 1 3 or 1-3)
        #[arg(required = true, num_args = 1..)]
        positions: Vec<String>,
    },

    /// Change a task
    Edit {
        position: String,

        #[arg(long)]
        content: Option<String>,

        #[arg(short, long)]
        priority: Option<u8>,
    },

    /// Delete tasks
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        positions: Vec<String>,
    },
}


/// Vital signs shared by `health add` and `health edit`.
#[derive(Args, Debug, Default)]
pub struct HealthArgs {
    /// YYYY-MM-DD (defaults to today when adding)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Weight in kg
    #[arg(long)]
    pub weight: Option<f64>,

    /// Height in cm
    #[arg(long)]
    pub height: Option<f64>,

    /// Beats per minute
    #[arg(long)]
    pub heart_rate: Option<u32>,

    /// Systolic blood pressure
    #[arg(long)]
    pub bp_high: Option<u32>,

    /// Diastolic blood pressure
    #[arg(long)]
    pub bp_low: Option<u32>,

    /// Hours of sleep
    #[arg(long)]
    pub sleep: Option<u32>,

    #[arg(long)]
    pub steps: Option<u32>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl From<HealthArgs> for HealthPatch {
    fn from(args: HealthArgs) -> Self {
        HealthPatch {
            date: args.date,
            weight: args.weight,
            height: args.height,
            heart_rate: args.heart_rate,
            bp_high: args.bp_high,
            bp_low: args.bp_low,
            sleep_hours: args.sleep,
            steps: args.steps,
            notes: args.notes,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum HealthCommands {
    /// Record measurements
    #[command(alias = "a")]
    Add(HealthArgs),

    /// List records, oldest first
    #[command(alias = "ls")]
    List,

    /// Show records in full
    Show {
        #[arg(required = true, num_args = 1..)]
        positions: Vec<String>,
    },

    /// Change a record; unset flags keep their value
    Edit {
        position: String,

        #[command(flatten)]
        values: HealthArgs,
    },

    /// Delete records
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        positions: Vec<String>,
    },

    /// Filter by date and weight (bounds inclusive)
    Query {
        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(long)]
        min_weight: Option<f64>,

        #[arg(long)]
        max_weight: Option<f64>,
    },

    /// Averages over all records
    Stats,
}


#[derive(Args, Debug)]
pub struct LifeArgs {
    pub title: String,

    #[arg(long)]
    pub content: Option<String>,

    /// e.g. Work, Travel (see `assist life categories`)
    #[arg(long)]
    pub category: Option<String>,

    /// e.g. Happy, Calm (see `assist life moods`)
    #[arg(long)]
    pub mood: Option<String>,
}

impl From<LifeArgs> for LifeEntry {
    fn from(args: LifeArgs) -> Self {
        LifeEntry {
            title: args.title,
            content: args.content,
            category: args.category,
            mood: args.mood,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum LifeCommands {
    /// Write an entry
    #[command(alias = "a")]
    Add(LifeArgs),

    /// List entries
    #[command(alias = "ls")]
    List,

    /// Show entries in full
    Show {
        #[arg(required = true, num_args = 1..)]
        positions: Vec<String>,
    },

    /// Replace an entry; unset fields are cleared
    Edit {
        position: String,

        #[command(flatten)]
        entry: LifeArgs,
    },

    /// Delete entries
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        positions: Vec<String>,
    },

    /// Find entries by keyword (every given keyword must match)
    Search {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        mood: Option<String>,
    },

    /// Suggested categories
    Categories,

    /// Suggested moods
    Moods,
}


/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD HH:MM` or a bare date (midnight).
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime, String> {
    let input = input.trim();
    NaiveDateTime::parse_from_str(input, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(input, DATE_FORMAT)
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|_| format!("expected YYYY-MM-DD [HH:MM[:SS]], got '{}'", input))
}

#[derive(Args, Debug, Default)]
pub struct CriteriaArgs {
    /// First day (inclusive)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day (inclusive)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// income or expense
    #[arg(long)]
    pub kind: Option<PaymentKind>,

    #[arg(long)]
    pub category: Option<String>,

    /// Text contained in the note
    #[arg(long)]
    pub note: Option<String>,

    /// Matches payments carrying any of these tags
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    #[arg(long)]
    pub min: Option<f64>,

    #[arg(long)]
    pub max: Option<f64>,
}

impl From<CriteriaArgs> for PaymentCriteria {
    fn from(args: CriteriaArgs) -> Self {
        PaymentCriteria {
            from: args.from,
            to: args.to,
            kind: args.kind,
            category: args.category,
            note: args.note,
            tags: args.tags,
            min_amount: args.min,
            max_amount: args.max,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum PayCommands {
    /// Record a payment
    #[command(alias = "a")]
    Add {
        amount: f64,

        /// income or expense
        kind: PaymentKind,

        /// When it happened (defaults to now)
        #[arg(long, value_parser = parse_datetime)]
        at: Option<NaiveDateTime>,

        /// Derived from the note when omitted
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        note: Option<String>,

        #[arg(long = "tag", value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// List payments, oldest first
    #[command(alias = "ls")]
    List,

    /// Show payments by id
    Show {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Change a payment; an empty --category recategorizes from the note
    Edit {
        id: String,

        #[arg(long)]
        amount: Option<f64>,

        #[arg(long)]
        kind: Option<PaymentKind>,

        #[arg(long, value_parser = parse_datetime)]
        at: Option<NaiveDateTime>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        note: Option<String>,

        /// Replaces all tags
        #[arg(long = "tag", value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },

    /// Delete payments by id
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Filter payments; no criteria lists everything
    Query(CriteriaArgs),

    /// Search payments; no criteria finds nothing
    Search(CriteriaArgs),

    /// Compare periods
    #[command(subcommand)]
    Compare(CompareCommands),

    /// Text charts
    #[command(subcommand)]
    Chart(ChartCommands),

    /// Spending analysis for a month
    Insights {
        /// YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<Month>,
    },
}


#[derive(Subcommand, Debug)]
pub enum CompareCommands {
    /// A month against the month before
    Month {
        /// YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<Month>,
    },

    /// Two date ranges, baseline first
    Ranges {
        from1: NaiveDate,
        to1: NaiveDate,
        from2: NaiveDate,
        to2: NaiveDate,
    },

    /// Totals per category and kind
    Categories,
}

#[derive(Subcommand, Debug)]
pub enum ChartCommands {
    /// Income and expense bars per month
    Monthly,

    /// Category shares of one kind
    Categories {
        #[arg(long, default_value = "expense")]
        kind: PaymentKind,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the data directory and file locations
    Path,

    /// Print a commented sample assist.toml
    Template,
}

/// Joins positional selector words so `1 3 5-6` and `1,3,5-6` are the same.
pub fn selector(words: &[String]) -> String {
    words.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("assist").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_work_after_subcommands() {
        let cli = parse(&["task", "list", "-o", "json", "-d", "/tmp/x"]);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn payment_kind_accepts_aliases() {
        let cli = parse(&["pay", "add", "12.5", "out", "--tag", "a,b"]);
        match cli.command {
            Commands::Pay(PayCommands::Add { kind, tags, .. }) => {
                assert_eq!(kind, PaymentKind::Expense);
                assert_eq!(tags, vec!["a", "b"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn dates_are_validated_at_parse_time() {
        assert!(Cli::try_parse_from(["assist", "health", "add", "--date", "03/05/2024"]).is_err());
        assert!(Cli::try_parse_from(["assist", "pay", "insights", "--month", "2024-13"]).is_err());
    }

    #[test]
    fn datetime_accepts_three_shapes() {
        assert_eq!(
            parse_datetime("2024-03-05 08:30").unwrap().to_string(),
            "2024-03-05 08:30:00"
        );
        assert_eq!(
            parse_datetime("2024-03-05").unwrap().to_string(),
            "2024-03-05 00:00:00"
        );
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn selectors_join_words() {
        let words = vec!["1".to_string(), "3-4".to_string()];
        assert_eq!(selector(&words), "1,3-4");
    }
}
