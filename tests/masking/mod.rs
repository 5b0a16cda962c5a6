use geocloud_rust::gazetteer::Gazetteer;
use geocloud_rust::lexicon::Lexicon;
use geocloud_rust::masking::TermMasker;

fn bundled_masker() -> TermMasker {
    let gazetteer = Gazetteer::bundled().unwrap();
    let lexicon = Lexicon::bundled().unwrap();
    let geo_terms: Vec<String> = gazetteer.place_names().map(str::to_string).collect();
    TermMasker::new(&[geo_terms, lexicon.political_terms, lexicon.hazard_phrases]).unwrap()
}

#[test]
fn test_place_phrase_masked() {
    let masker = bundled_masker();
    let masked = masker.mask("Red tide returns to Tampa Bay");

    let tokens: Vec<&str> = masked.split_whitespace().collect();
    assert!(!tokens.contains(&"tampa"));
    assert!(!tokens.contains(&"bay"));
    assert!(!tokens.iter().any(|t| t.eq_ignore_ascii_case("tampa")));
    assert_eq!(masked, "na returns to na na");
}

#[test]
fn test_political_and_hazard_terms_masked() {
    let masker = bundled_masker();
    assert_eq!(masker.mask("DeSantis blames Red Tide"), "na blames na");
    assert_eq!(masker.mask("karenia brevis counts up"), "na counts up");
    assert_eq!(masker.mask("#kbrevis spotted"), "#na spotted");
}

#[test]
fn test_possessive_of_mask_collapses() {
    let masker = bundled_masker();
    assert_eq!(masker.mask("Sarasota's beaches"), "na beaches");
}

#[test]
fn test_whole_words_only() {
    let masker = TermMasker::new(&[vec!["Venice".to_string()]]).unwrap();
    assert_eq!(masker.mask("Venice venetian"), "na venetian");
    assert_eq!(masker.mask("venicebeach"), "venicebeach");
}

#[test]
fn test_special_characters_are_literal() {
    let masker = TermMasker::new(&[vec!["St. Pete Beach".to_string()]]).unwrap();
    assert_eq!(masker.mask("Sunset at St. Pete Beach"), "sunset at na");
    assert_eq!(masker.mask("stx pete beach"), "stx pete beach");
}

#[test]
fn test_no_terms_only_lowercases() {
    let masker = TermMasker::new(&[Vec::new(), vec![String::new()]]).unwrap();
    assert_eq!(masker.mask("Nothing To Mask"), "nothing to mask");
}
