//! Quantity mutation for any entity that carries a stock level.

use tally_core::{Entity, RepoError, Repository};

/// An entity with a name and a non-negative quantity.
pub trait Stocked: Entity {
    fn name(&self) -> &str;

    fn quantity(&self) -> i32;

    /// Copy of `self` carrying `quantity`.
    fn with_quantity(&self, quantity: i32) -> Self;
}

/// Reject negative quantities for entities of kind `T`.
pub fn check_quantity<T: Entity>(quantity: i32) -> Result<(), RepoError> {
    if quantity < 0 {
        return Err(RepoError::invalid(
            T::KIND,
            format!("quantity cannot be negative (got {quantity})"),
        ));
    }
    Ok(())
}

/// Set the stock level of `id` to `quantity`.
///
/// The quantity is validated before the existence check; neither failure
/// modifies the repository.
pub fn set_quantity<T: Stocked>(
    repo: &mut Repository<T>,
    id: T::Id,
    quantity: i32,
) -> Result<&T, RepoError> {
    check_quantity::<T>(quantity)?;
    repo.replace_with(id, |item| Ok(item.with_quantity(quantity)))
}

/// Add `amount` (> 0) to the stock level of `id`.
pub fn increase_stock<T: Stocked>(
    repo: &mut Repository<T>,
    id: T::Id,
    amount: i32,
) -> Result<&T, RepoError> {
    if amount <= 0 {
        return Err(RepoError::invalid(
            T::KIND,
            format!("stock increase must be positive (got {amount})"),
        ));
    }
    repo.replace_with(id, |item| {
        let next = item.quantity().checked_add(amount).ok_or_else(|| {
            RepoError::invalid(T::KIND, format!("quantity overflow for id {id}"))
        })?;
        Ok(item.with_quantity(next))
    })
}
