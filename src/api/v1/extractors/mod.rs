/*!
 * Request extractors shared by v1 handlers.
 *
 * - Claims: verified caller claims (set by the permission guard)
 * - DrinkId: `/drinks/{drink_id}` path id
 */

mod claims;
mod drink_id;

pub use claims::Claims;
pub use drink_id::{DrinkId, require_drink_id};
