//! Still image viewer.

use std::path::Path;

use crate::backend::{Backend, Display, Keys, Wait};
use crate::error::{HelperError, Result};
use crate::frame::FrameSize;

/// Decode the image at `path` and, if `display_enabled`, show it until a key is pressed.
///
/// The window is titled with the path. Returns the decoded image size.
///
/// # Errors
/// * `HelperError::DecodeFailed` - the path does not resolve to a readable image
pub fn view_image<B, D, K>(
    backend: &mut B,
    display: &mut D,
    keys: &mut K,
    path: &Path,
    display_enabled: bool,
) -> Result<FrameSize>
where
    B: Backend,
    D: Display,
    K: Keys,
{
    let image = backend.read_image(path)?;

    if display_enabled {
        match display.show(&path.to_string_lossy(), &image) {
            Ok(()) => {
                let key = keys.wait_key(Wait::Forever);
                log::debug!("Image window dismissed by {:?}", key);
            }
            Err(HelperError::WindowClosed) => log::debug!("Image window closed"),
            Err(e) => return Err(e),
        }
    }

    Ok(image.size)
}
