pub mod extractor;
pub mod fetcher;

pub use extractor::HtmlLinkExtractor;
pub use fetcher::ReqwestFetcher;
