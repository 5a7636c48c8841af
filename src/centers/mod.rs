//! Voting-center subsystem.
//!
//! Provides the backend listing client, a local listing cache, and the
//! directory that chains them.

pub mod cache;
pub mod client;
pub mod directory;
pub mod types;

pub use cache::CenterCache;
pub use client::CenterClient;
pub use directory::CenterDirectory;
pub use types::{
    CandidateFilter, Candidato, CandidatoDetalle, CenterDetail, CenterError, CenterFilter,
    CenterListing, CenterRecord, CenterSource, Mesa, Partido, Postulacion, VotingCenter,
};
