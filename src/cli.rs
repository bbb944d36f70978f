use crate::domain::models::{Amenity, FilterCriteria, NewCafe};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cafes", version, about = "Find cafes by location and amenities")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Catalog service base URL (overrides CAFES_API_URL and config file)"
    )]
    pub api_url: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

/// The filter form.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, help = "Location substring (case-insensitive)")]
    pub location: Option<String>,
    #[arg(long, help = "Require Wi-Fi")]
    pub wifi: bool,
    #[arg(long, help = "Require power sockets")]
    pub sockets: bool,
    #[arg(long, help = "Require a toilet")]
    pub toilet: bool,
    #[arg(long, help = "Require phone-call friendliness")]
    pub calls: bool,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        let mut c = FilterCriteria::default();
        if let Some(loc) = self.location.as_deref().filter(|l| !l.is_empty()) {
            c = c.with_location(loc);
        }
        for (set, amenity) in [
            (self.wifi, Amenity::Wifi),
            (self.sockets, Amenity::Sockets),
            (self.toilet, Amenity::Toilet),
            (self.calls, Amenity::Calls),
        ] {
            if set {
                c = c.require(amenity);
            }
        }
        c
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filtered cafe list
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, help = "Ignore cached results")]
        refresh: bool,
    },
    /// Map markers and viewport for the filtered cafes
    Map {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, help = "Cafe id to center the map on")]
        select: Option<i64>,
        #[arg(long, help = "Ignore cached results")]
        refresh: bool,
    },
    /// List and map together, with an optional selection
    View {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        select: Option<i64>,
        #[arg(long, help = "Ignore cached results")]
        refresh: bool,
    },
    /// Interactive session; reads filter edits from stdin
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// One random cafe
    Random,
    /// Add a cafe to the catalog
    Add(AddArgs),
    /// Show the coordinates a map link resolves to
    Locate { map_url: String },
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub map_url: String,
    #[arg(long, default_value = "")]
    pub img_url: String,
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub seats: String,
    #[arg(long, default_value = "")]
    pub coffee_price: String,
    #[arg(long)]
    pub wifi: bool,
    #[arg(long)]
    pub sockets: bool,
    #[arg(long)]
    pub toilet: bool,
    #[arg(long)]
    pub calls: bool,
}

impl AddArgs {
    pub fn draft(&self) -> NewCafe {
        NewCafe {
            name: self.name.clone(),
            map_url: self.map_url.clone(),
            img_url: self.img_url.clone(),
            location: self.location.clone(),
            has_sockets: self.sockets,
            has_toilet: self.toilet,
            has_wifi: self.wifi,
            can_take_calls: self.calls,
            seats: self.seats.clone(),
            coffee_price: self.coffee_price.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Drop every cached query
    Clear,
    /// Drop cached queries past the eviction window
    Prune,
}
