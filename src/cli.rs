use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP recommendation daemon
    Daemon {},

    /// Recommend recipes for one or more taste inputs
    Recommend {
        /// Taste input, repeatable (e.g. -t sweet -t fruity)
        #[clap(short, long = "taste")]
        taste: Vec<String>,

        /// Exclude recipes whose title contains this term, repeatable
        #[clap(short, long = "exclude")]
        exclude: Vec<String>,

        /// "single" uses the first taste input, "blend" averages them
        #[clap(long, default_value = "single")]
        mode: String,

        /// "low" sorts by calories ascending instead of similarity
        #[clap(long, default_value = "")]
        budget: String,
    },

    /// Look up flavor compounds for a term and print them
    Compounds {
        /// Term to query the flavor database with
        term: String,
    },

    /// Fetch the enriched recipe set and print a sample
    Recipes {},
}
