pub mod beta_fit;
mod convergence;
pub mod moments;
mod normalization;
mod special;
pub mod tail;
pub mod types;

pub use beta_fit::fit_beta;
pub use moments::{moments_from_beta, rescale};
pub use normalization::normalize;
pub use tail::tail_probability;
pub use types::{BetaFit, MomentEstimate, SpreadMode, TailProbability};
