//! Integration tests for license and reference scrubbing.

use docsift::{
    ref_score, BBox, Block, ContentScrubber, LineSignals, ReferenceConfig, RegionClass,
    ScoreWeights, ScrubConfig,
};

fn block(class: RegionClass, content: &str) -> Block {
    Block::new(class, content, BBox::new(100.0, 200.0, 900.0, 260.0).unwrap(), 4)
}

fn contents(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(|b| b.content.as_str()).collect()
}

#[test]
fn test_creative_commons_notice_excised() {
    let notice = "CC BY-NC 4.0 International license It is made available under a";
    let before = "The trial enrolled adults from three regional hospitals between 2015 and 2019, \
                  and every participant gave written consent.";
    let content = format!("{} {} The cohort was followed for two years.", before, notice);

    let config = ScrubConfig::default();
    let out = ContentScrubber::new(&config)
        .unwrap()
        .scrub(vec![block(RegionClass::Text, &content)]);

    assert_eq!(out.blocks.len(), 1);
    assert!(out.blocks[0].content.starts_with(before));
    assert!(out.blocks[0].content.ends_with("The cohort was followed for two years."));
    assert!(!out.blocks[0].content.contains("International license"));

    assert_eq!(out.removed_licenses.len(), 1);
    assert_eq!(out.removed_licenses[0].content, notice);
    assert_eq!(out.removed_licenses[0].class, RegionClass::Text);
    assert_eq!(out.removed_licenses[0].bbox, out.blocks[0].bbox);
    assert!(out.removed_references.is_empty());
}

#[test]
fn test_reference_run_removed_by_median() {
    let strong = "[1] A. Smith, B. Jones. Title. Proc. CVPR, 2019, pp. 1-9.";
    let weak = "[2] See Figure 3 for details.";
    let weights = ScoreWeights::default();

    assert!(ref_score(strong, &weights) > 2.0);
    assert!(ref_score(weak, &weights) < 2.0);

    let config = ScrubConfig::default();
    let out = ContentScrubber::new(&config).unwrap().scrub(vec![
        block(RegionClass::SectionHeader, "Introduction"),
        block(RegionClass::Text, "We review prior work on layout analysis."),
        block(RegionClass::ListItem, strong),
        block(RegionClass::ListItem, weak),
        block(RegionClass::Text, "The next section describes our data."),
    ]);

    assert_eq!(
        contents(&out.blocks),
        vec![
            "Introduction",
            "We review prior work on layout analysis.",
            "The next section describes our data.",
        ]
    );
    assert_eq!(contents(&out.removed_references), vec![strong, weak]);
}

#[test]
fn test_run_threshold_is_configurable() {
    let items = vec![
        block(RegionClass::ListItem, "Participants were recruited online."),
        block(RegionClass::ListItem, "Sessions lasted one hour."),
    ];

    let config = ScrubConfig::default();
    let out = ContentScrubber::new(&config).unwrap().scrub(items.clone());
    assert_eq!(out.blocks, items);

    let lenient = ScrubConfig {
        reference: ReferenceConfig::default().with_run_threshold(-1.0),
        ..Default::default()
    };
    let out = ContentScrubber::new(&lenient).unwrap().scrub(items);
    assert!(out.blocks.is_empty());
    assert_eq!(out.removed_references.len(), 2);
}

#[test]
fn test_line_signals_explain_score() {
    let signals = LineSignals::detect(
        "J. Smith, K. Lee. Deep layouts. Nature, vol. 12, pp. 45-67, 2020. doi:10.1000/xyz",
    );
    assert!(signals.year);
    assert!(signals.doi);
    assert!(signals.volume_issue);
    assert!(signals.fired().contains(&"doi"));
    assert!(signals.score(&ScoreWeights::default()) > 2.0);
}

#[test]
fn test_plain_document_untouched() {
    let blocks = vec![
        block(RegionClass::SectionHeader, "Methods"),
        block(RegionClass::Text, "Samples were stored at four degrees."),
        block(RegionClass::Picture, "images/paper/p004_picture01.png"),
    ];
    let config = ScrubConfig::default();
    let out = ContentScrubber::new(&config).unwrap().scrub(blocks.clone());
    assert_eq!(out.blocks, blocks);
    assert!(out.removed_licenses.is_empty());
    assert!(out.removed_references.is_empty());
}
