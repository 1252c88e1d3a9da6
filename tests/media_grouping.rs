use std::error::Error;

use sasspipe::pipeline::{MediaGroupStage, Stage};

type TestResult = Result<(), Box<dyn Error>>;

fn apply(css: &str) -> Result<String, Box<dyn Error>> {
    Ok(MediaGroupStage::new().apply(css)?)
}

#[test]
fn media_blocks_sorted_ascending_regardless_of_source_order() -> TestResult {
    let css = "\
@media screen and (min-width: 900px) {
  .b {
    color: blue;
  }
}

.a {
  color: red;
}

@media screen and (min-width: 600px) {
  .c {
    color: green;
  }
}
";

    let out = apply(css)?;

    let plain = out.find(".a").ok_or("missing .a")?;
    let small = out.find("600px").ok_or("missing 600px group")?;
    let large = out.find("900px").ok_or("missing 900px group")?;

    assert!(plain < small, "plain rules must precede media groups");
    assert!(small < large, "mobile-first: 600px before 900px");

    Ok(())
}

#[test]
fn duplicate_conditions_merge_into_one_block() -> TestResult {
    let css = "\
@media (min-width: 600px) {
  .a {
    color: red;
  }
}

@media (min-width: 600px) {
  .b {
    color: blue;
  }
}
";

    let out = apply(css)?;

    assert_eq!(
        out.matches("@media (min-width: 600px)").count(),
        1,
        "same condition must collapse into a single block"
    );

    let a = out.find(".a").ok_or("missing .a")?;
    let b = out.find(".b").ok_or("missing .b")?;
    assert!(a < b, "merged bodies keep source order");

    Ok(())
}

#[test]
fn em_breakpoints_compared_at_sixteen_px() -> TestResult {
    // 40em = 640px, so it sorts between 600px and 700px.
    let css = "\
@media (min-width: 700px) {
  .c { color: red; }
}
@media (min-width: 40em) {
  .b { color: red; }
}
@media (min-width: 600px) {
  .a { color: red; }
}
";

    let out = apply(css)?;

    let px600 = out.find("600px").ok_or("missing 600px")?;
    let em40 = out.find("40em").ok_or("missing 40em")?;
    let px700 = out.find("700px").ok_or("missing 700px")?;

    assert!(px600 < em40 && em40 < px700);

    Ok(())
}

#[test]
fn max_width_only_groups_come_after_min_width_descending() -> TestResult {
    let css = "\
@media (max-width: 500px) {
  .s { color: red; }
}
@media (max-width: 800px) {
  .m { color: red; }
}
@media (min-width: 900px) {
  .l { color: red; }
}
";

    let out = apply(css)?;

    let min900 = out.find("min-width: 900px").ok_or("missing min group")?;
    let max800 = out.find("max-width: 800px").ok_or("missing max 800")?;
    let max500 = out.find("max-width: 500px").ok_or("missing max 500")?;

    assert!(min900 < max800, "min-width groups precede max-width-only");
    assert!(max800 < max500, "max-width-only groups sort descending");

    Ok(())
}

#[test]
fn grouping_is_idempotent() -> TestResult {
    let css = "\
.a {
  color: red;
}

@media (min-width: 900px) {
  .b {
    color: blue;
  }
}

@media (min-width: 600px) {
  .c {
    color: green;
  }
}
";

    let once = apply(css)?;
    let twice = apply(&once)?;

    assert_eq!(once, twice);

    Ok(())
}

#[test]
fn slash_star_slash_opens_a_comment_without_closing_it() -> TestResult {
    // The opener's `*` must not double as the closer: `/*/` starts a
    // comment that only ends at the next `*/`. The brace inside must not
    // disturb the depth count.
    let css = "\
/*/ still a comment { */
.b {
  color: red;
}

@media (min-width: 600px) {
  .a { color: blue; }
}
";

    let out = apply(css)?;

    let plain = out.find(".b").ok_or("missing .b")?;
    let media = out.find("@media (min-width: 600px)").ok_or("missing media group")?;
    assert!(plain < media, "media group must be re-appended after plain rules");

    Ok(())
}

#[test]
fn braces_inside_strings_do_not_break_parsing() -> TestResult {
    let css = "\
.a {
  content: \"{ not a block }\";
}

@media (min-width: 600px) {
  .b { color: red; }
}
";

    let out = apply(css)?;

    assert!(out.contains("content: \"{ not a block }\""));
    assert_eq!(out.matches("@media").count(), 1);

    Ok(())
}
