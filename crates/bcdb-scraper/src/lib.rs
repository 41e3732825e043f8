pub mod assets;
pub mod client;
pub mod error;
pub mod extract;
pub mod frontier;
pub mod outcome;
pub mod rate_limit;
pub mod resolver;
pub mod toll;
pub mod urls;

pub use assets::AssetCache;
pub use client::SourceClient;
pub use error::ScraperError;
pub use extract::{
    parse_listing, BrandPageExtractor, ExtractedBrand, Extractor, ListedBrand, ShapeMismatch,
};
pub use frontier::Frontier;
pub use outcome::{visit_page, PageOutcome};
pub use rate_limit::Politeness;
pub use resolver::{ResolverSettings, SeedCandidate, SeedResolver};
pub use toll::{derive_snapshot, fetch_toll, last_known, HistoryPoint};
pub use urls::BrandUrls;
