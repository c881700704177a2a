pub mod board;
pub mod data;
pub mod kickoff;
pub mod normalize;
pub mod odds;
pub mod relevance;
pub mod rounds;
pub mod status;
