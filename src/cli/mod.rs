use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Validate one or more locations and print the report
    Validate {
        /// A location as "City,Country"; repeat for several
        #[arg(short = 'l', long = "location")]
        locations: Vec<String>,

        /// Forecast date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long, default_value = "celsius")]
        unit: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the locations, then ask the assistant for their forecast
    Ask {
        #[arg(short = 'l', long = "location")]
        locations: Vec<String>,

        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long, default_value = "celsius")]
        unit: String,
    },

    /// Send a free-form message to the assistant
    Chat { message: String },

    /// Edit a form line by line while checks run in the background
    Interactive,

    /// Start the HTTP relay (health, chat, and city validation endpoints)
    Serve {
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },
}
