use auction_snap::sanitize::{DEFAULT_POLICY, plain_text, sanitize, try_sanitize};

#[test]
fn removes_scripts_and_styles_with_their_content() {
    let cleaned = sanitize("<div>a<script>alert(1)</script><style>p { color: red }</style>b</div>");
    assert_eq!(cleaned, "<div>ab</div>");
}

#[test]
fn unwraps_disallowed_tags_in_place() {
    let cleaned = sanitize("<div><span>a</span><p>b <strong>c</strong></p><span>d</span></div>");
    assert_eq!(cleaned, "<div><span>a</span>b <strong>c</strong><span>d</span></div>");

    let cleaned = sanitize(r#"<div><font color="red">outbid</font> <img src="x.png">now</div>"#);
    assert_eq!(cleaned, "<div>outbid now</div>");
}

#[test]
fn drops_empty_elements_unless_allowed_empty() {
    let cleaned = sanitize("<div><span></span><div></div><span> </span>text</div>");
    assert_eq!(cleaned, "<div><div></div>text</div>");

    let cleaned = sanitize("<div>a<br>b</div>");
    assert_eq!(cleaned, "<div>a<br>b</div>");
}

#[test]
fn entity_only_content_is_not_empty() {
    let cleaned = sanitize("<div><span>&nbsp;</span>x &amp; y</div>");
    assert_eq!(cleaned, "<div><span>&nbsp;</span>x &amp; y</div>");
}

#[test]
fn strips_comments() {
    assert_eq!(sanitize("<div><!-- tracking -->x</div>"), "<div>x</div>");
}

#[test]
fn anchors_open_in_new_window() {
    let cleaned = sanitize(r#"<div><a href="/x" onclick="go()">x</a></div>"#);
    assert_eq!(cleaned, r#"<div><a href="/x" target="_blank">x</a></div>"#);

    let cleaned = sanitize(r#"<div><a href="/x" target="_self">x</a></div>"#);
    assert_eq!(cleaned, r#"<div><a href="/x" target="_self">x</a></div>"#);
}

#[test]
fn filters_attributes_per_tag() {
    let cleaned = sanitize(
        r#"<div id="a" class="b" data-x="1" style="color:red"><span title="t" class="c">x</span><strong class="s">y</strong></div>"#,
    );
    assert_eq!(
        cleaned,
        r#"<div class="b" id="a" style="color:red"><span class="c">x</span><strong>y</strong></div>"#
    );
}

#[test]
fn root_attributes_are_filtered_but_root_is_kept() {
    let cleaned = sanitize(r#"<section role="alert" id="s"><span>x</span></section>"#);
    assert_eq!(cleaned, "<section><span>x</span></section>");
}

#[test]
fn removes_noise_elements() {
    let cleaned = sanitize(
        r#"<div><span class="msgTextAlign">Sie wurden überboten.</span><span class="statusRightContent">Jetzt erneut bieten</span></div>"#,
    );
    assert_eq!(
        cleaned,
        r#"<div><span class="msgTextAlign">Sie wurden überboten.</span></div>"#
    );
}

#[test]
fn strips_line_breaks_and_tabs() {
    assert_eq!(sanitize("<div>\n\tA\r\n</div>"), "<div>A</div>");
}

#[test]
fn sanitizing_twice_changes_nothing() {
    let inputs = [
        r#"<div id="msgPanel" class="msgPanel" role="alert">  <!-- c -->  <div class="statusLeftContent"><span>Sie wurden überboten.</span><span class="statusRightContent">x</span></div></div>"#,
        r#"<div><font>You've been outbid.</font> <a href="/bid" onclick="t()">Bid</a><script>t()</script></div>"#,
        "<div><p>a <em>b</em></p><span></span><br></div>",
        r#"<div><a href="/x">x<object><a href="/y">y</a></object></a></div>"#,
        r#"<div><a href="/x">x<table><tr><td><a href="/y">y</a></td></tr></table></a></div>"#,
    ];

    for input in inputs {
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once, "input: {input}");
    }
}

#[test]
fn anchors_inside_anchors_are_unwrapped() {
    let cleaned = sanitize(r#"<div><a href="/x">x<object><a href="/y">y</a></object></a></div>"#);
    assert_eq!(cleaned, r#"<div><a href="/x" target="_blank">xy</a></div>"#);

    let cleaned = sanitize(r#"<a href="/x">x<table><tr><td><a href="/y">y</a></td></tr></table></a>"#);
    assert_eq!(cleaned, r#"<a href="/x" target="_blank">xy</a>"#);
}

#[test]
fn markup_without_elements_is_passed_through() {
    assert!(try_sanitize("plain words", &DEFAULT_POLICY).is_err());
    assert_eq!(sanitize("plain words"), "plain words");
    assert_eq!(sanitize(""), "");
}

#[test]
fn plain_text_collapses_and_trims_separators() {
    assert_eq!(
        plain_text("<div><span>Angebot</span>   beendet - </div>"),
        "Angebot beendet"
    );
    assert_eq!(plain_text("<div>A | B |</div>"), "A | B");
    assert_eq!(plain_text("<div> </div>"), "");
}
