//! Recursive traversal of a driver namespace.

use berth_driver::{DriverResult, FileInfo, StorageDriver};
use futures::future::BoxFuture;
use futures::FutureExt;

/// Callback verdict for each visited node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkControl {
    /// Keep going; directories are descended into.
    Continue,
    /// Do not descend into this directory. Has no further effect on files.
    SkipDir,
}

/// Pre-order traversal of the driver namespace starting at `from`.
///
/// Every child of `from` is stat'ed and handed to `f`; directories are then
/// descended depth-first unless `f` answered [`WalkControl::SkipDir`]. An
/// error returned by `f` or by the driver aborts the traversal and
/// propagates.
///
/// The traversal is not snapshot-isolated: concurrent mutation of the
/// namespace may be observed.
pub fn walk<'a, F>(
    driver: &'a dyn StorageDriver,
    from: &'a str,
    f: &'a mut F,
) -> BoxFuture<'a, DriverResult<()>>
where
    F: FnMut(&FileInfo) -> DriverResult<WalkControl> + Send,
{
    async move {
        let children = driver.list(from).await?;
        for child in children {
            let info = driver.stat(&child).await?;
            let verdict = f(&info)?;
            if info.is_dir() && verdict == WalkControl::Continue {
                walk(driver, &child, f).await?;
            }
        }
        Ok(())
    }
    .boxed()
}
