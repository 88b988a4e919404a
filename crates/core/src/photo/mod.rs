mod batching;

pub use batching::{
    plan_batches, select_photos, DEFAULT_PICKER_PHOTO_COUNT, MAX_PHOTOS_PER_REQUEST,
};
