use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse criteria text and print its canonical form
    Parse {
        #[command(subcommand)]
        target: ParseCommand,
    },
    /// Rewrite criteria through a mapping config
    Cast {
        #[arg(long, help = "Mapping config file path (JSON)")]
        mapping: String,

        #[arg(long, help = "Filter criteria to rewrite")]
        filter: Option<String>,

        #[arg(long, help = "Sort criteria to rewrite")]
        sort: Option<String>,

        #[arg(long, help = "Print the rewritten criteria as JSON")]
        json: bool,
    },
    /// Filter and sort a JSON array of records
    Query {
        #[arg(long, help = "Records file path (JSON array)")]
        records: String,

        #[arg(
            long,
            help = "Shape schema file path; inferred from the records when omitted"
        )]
        shape: Option<String>,

        #[arg(long, default_value = "", help = "Filter criteria")]
        filter: String,

        #[arg(long, default_value = "", help = "Sort criteria")]
        sort: String,

        #[arg(
            long,
            default_value_t = 1024,
            help = "Records evaluated between cancellation checks"
        )]
        batch_size: usize,

        #[arg(
            long,
            help = "If specified, writes the matching records to this file instead of stdout"
        )]
        output: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ParseCommand {
    Filter {
        /// Filter text, e.g. "age:gte(25),or(name:John,name:Bob)"
        expr: String,

        #[arg(long, help = "Print the parsed criteria as JSON")]
        json: bool,
    },
    Sort {
        /// Sort text, e.g. "salary:desc,name:asc"
        expr: String,

        #[arg(long, help = "Print the parsed criteria as JSON")]
        json: bool,
    },
}
