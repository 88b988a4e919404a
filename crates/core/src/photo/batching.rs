//! Batch planning and selection for random photo requests.
//!
//! The photo API serves a bounded number of photos per request, so larger
//! requests are split into batches that run in parallel. Failed batches are
//! simply missing from the result; the selection step works with whatever
//! arrived.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::task::Photo;

/// Maximum photos the photo API returns for a single request.
pub const MAX_PHOTOS_PER_REQUEST: usize = 30;

/// Number of photos offered by the photo picker.
pub const DEFAULT_PICKER_PHOTO_COUNT: usize = 30;

/// Splits `count` photos into request sizes of at most `batch_size`.
///
/// A `batch_size` of zero is treated as one. A `count` of zero yields no batches.
pub fn plan_batches(count: usize, batch_size: usize) -> Vec<usize> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(count.div_ceil(batch_size));
    let mut remaining = count;
    while remaining > 0 {
        let size = remaining.min(batch_size);
        batches.push(size);
        remaining -= size;
    }
    batches
}

/// Shuffles the fetched photos and keeps at most `count` of them.
pub fn select_photos<R>(mut photos: Vec<Photo>, count: usize, rng: &mut R) -> Vec<Photo>
where
    R: Rng + ?Sized,
{
    photos.shuffle(rng);
    photos.truncate(count);
    photos
}
