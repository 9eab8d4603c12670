//! [`Command`] definition.

pub mod approve_booking;
pub mod cancel_booking;
pub mod create_pricing_rule;
pub mod place_order;
pub mod reject_booking;
pub mod save_renter_profile;
pub mod set_pricing_rule_active;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    approve_booking::ApproveBooking, cancel_booking::CancelBooking,
    create_pricing_rule::CreatePricingRule, place_order::PlaceOrder,
    reject_booking::RejectBooking, save_renter_profile::SaveRenterProfile,
    set_pricing_rule_active::SetPricingRuleActive,
};
