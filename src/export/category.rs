//! human readable names for category GUIDs

/// known category GUIDs and their names
const CATEGORY_NAMES: [(&str, &str); 9] = [
    ("5d42b198-efca-431c-92aa-8b595d0d39c2", "User Notifications"),
    ("624ed9c3-bdfd-41fa-96c3-7c824ea32e3d", "Environment"),
    ("0cd5aa2b-ef23-4997-80b5-7d0e8fe5b312", "Graph Document Colors"),
    ("92d153ee-57d7-431f-a739-0931ca3f7f70", "Cider"),
    ("92ecf08e-8b13-4cf4-99e9-ae2692382185", "Tree View"),
    ("f1095fad-881f-45f1-8580-589e10325eb8", "Search Control"),
    ("4aff231b-f28a-44f0-a66b-1beeb17cb920", "Team Explorer"),
    ("2138d120-456d-425e-80b5-88d2401fca23", "Work Item Editor"),
    ("b239f458-9f75-4376-959b-4d48b89337f4", "Manifest Designer"),
];

/// the name of a category GUID, or the GUID itself if it isn't a known one
///
/// braces and letter case are ignored when matching
#[bearive::argdoc]
pub fn category_name<'a>(
    /// the GUID as the host wrote it
    guid: &'a str,
) -> &'a str {
    let bare = guid.trim().trim_start_matches('{').trim_end_matches('}');

    CATEGORY_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(bare))
        .map_or(guid, |(_, name)| *name)
}

/// the text of a record's category column, empty when there's no category
pub fn category_label(category: Option<&str>) -> &str {
    category.map(category_name).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_guids() {
        assert_eq!(
            category_name("624ed9c3-bdfd-41fa-96c3-7c824ea32e3d"),
            "Environment"
        );
        assert_eq!(
            category_name("{92ECF08E-8B13-4CF4-99E9-AE2692382185}"),
            "Tree View"
        );
    }

    #[test]
    fn test_unknown_guid_passes_through() {
        let guid = "00000000-0000-0000-0000-000000000001";
        assert_eq!(category_name(guid), guid);
    }

    #[test]
    fn test_missing_category_is_empty() {
        assert_eq!(category_label(None), "");
        assert_eq!(
            category_label(Some("b239f458-9f75-4376-959b-4d48b89337f4")),
            "Manifest Designer"
        );
    }
}
