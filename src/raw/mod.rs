mod arena;
mod handle;
mod node;
mod raw_ranked_index;

pub(crate) use handle::Handle;
pub(crate) use node::MAX_LEVEL;
pub(crate) use raw_ranked_index::RawRankedIndex;
