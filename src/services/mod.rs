pub mod browse;
pub mod catalog;
pub mod detail_fetcher;
pub mod lists;
pub mod posters;
pub mod profile;
pub mod search;
pub mod search_history;

pub use browse::BrowseService;
pub use catalog::{CatalogClient, KinopoiskClient};
pub use detail_fetcher::DetailFetcher;
pub use lists::LocalListStore;
pub use posters::{Poster, PosterCache, PosterPolicy};
pub use profile::ProfileService;
pub use search::SearchService;
pub use search_history::SearchHistory;
