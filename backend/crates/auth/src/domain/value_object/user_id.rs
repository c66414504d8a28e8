use kernel::id::Id;

/// Marker for [`UserId`].
pub struct UserMarker;

/// Primary key of a user. Travels in tokens as its hyphenated string form.
pub type UserId = Id<UserMarker>;

/// Parse the `id` claim of a token. `None` for anything that is not a UUID.
pub fn parse_user_id(claim: &str) -> Option<UserId> {
    claim.parse().ok()
}
