//! The listing pages that sit next to the authoring forms.

use bz_core::models::{Listing, ListingKind};
use bz_ui::ListingIndex;

pub fn heading(kind: ListingKind) -> &'static str {
    match kind {
        ListingKind::Item => "Shop",
        ListingKind::Course => "Blog",
    }
}

/// Index view over listings fetched with [`crate::SubmissionClient::list`].
pub fn index_view(kind: ListingKind, listings: &[Listing]) -> ListingIndex<'_> {
    ListingIndex {
        heading: heading(kind),
        listing_base: kind.list_path(),
        listings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bz_ui::Template;

    #[test]
    fn empty_shop_page() {
        let html = index_view(ListingKind::Item, &[]).render().unwrap();
        assert!(html.contains("Shop"));
        assert!(html.contains("Nothing here yet."));
    }
}
