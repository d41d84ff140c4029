//! Integration tests for the extraction pipeline over full product pages

mod common;

use common::pages;
use pretty_assertions::assert_eq;
use price_watch::common::types::ExtractorKind;
use price_watch::extraction::ExtractionPipeline;
use rust_decimal_macros::dec;

fn pipeline() -> ExtractionPipeline {
    ExtractionPipeline::standard().expect("Failed to build pipeline")
}

#[test]
fn test_structured_data_wins_over_visible_text() {
    let found = pipeline()
        .extract_detailed(pages::JSON_LD_PRODUCT, "https://shop.example.org/p/kulaklik")
        .unwrap();

    assert_eq!(found.price, dec!(4999.00));
    assert_eq!(found.source, ExtractorKind::StructuredData);
}

#[test]
fn test_visible_text_ignores_scripts_and_small_fees() {
    let price = pipeline().extract(pages::TEXT_ONLY_PRODUCT, "shop.example.org");
    assert_eq!(price, Some(dec!(1649.90)));
}

#[test]
fn test_storefront_profile_by_host() {
    let found = pipeline()
        .extract_detailed(pages::TRENDYOL_PRODUCT, "https://www.trendyol.com/marka/urun-p-1")
        .unwrap();

    assert_eq!(found.profile, "trendyol");
    assert_eq!(found.source, ExtractorKind::ClassText);
    assert_eq!(found.price, dec!(1899.00));
}

#[test]
fn test_embedded_state_minor_units() {
    let found = pipeline()
        .extract_detailed(pages::EMBEDDED_STATE_PRODUCT, "www.trendyol.com")
        .unwrap();

    assert_eq!(found.source, ExtractorKind::EmbeddedState);
    assert_eq!(found.price, dec!(12499));
}

#[test]
fn test_same_page_on_unknown_host_uses_generic_profile() {
    // the discount class means nothing outside its storefront
    let found = pipeline()
        .extract_detailed(pages::TRENDYOL_PRODUCT, "shop.example.org")
        .unwrap();

    assert_eq!(found.profile, "generic");
    assert_eq!(found.source, ExtractorKind::FreeText);
    assert_eq!(found.price, dec!(1899.00));
}

#[test]
fn test_no_price_is_unknown() {
    assert_eq!(pipeline().extract(pages::NO_PRICE, "shop.example.org"), None);
    assert_eq!(pipeline().extract(pages::NO_PRICE, "www.hepsiburada.com"), None);
    assert_eq!(pipeline().extract("", "shop.example.org"), None);
}

#[test]
fn test_extraction_is_deterministic() {
    let pipeline = pipeline();
    let first = pipeline.extract_detailed(pages::TEXT_ONLY_PRODUCT, "shop.example.org");
    for _ in 0..5 {
        assert_eq!(
            pipeline.extract_detailed(pages::TEXT_ONLY_PRODUCT, "shop.example.org"),
            first
        );
    }
}
