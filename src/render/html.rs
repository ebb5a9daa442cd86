// HTML media kit document.
//
// Produces a single self-contained page (inline CSS, no external assets
// besides image URLs the creator supplied) that prints cleanly to A4 and is
// the input for PDF export. All user-supplied text goes through `escape`.

use std::fmt::Write;

use super::{format_date, format_number, RenderContext};
use crate::engagement::models::EngagementQuality;
use crate::output::truncate_chars;

/// Captions longer than this are cut in the top-posts grid.
const CAPTION_PREVIEW_CHARS: usize = 140;

const STYLE: &str = r#"
  @page { size: A4; margin: 18mm; }
  body { font-family: "Helvetica Neue", Arial, sans-serif; color: #1f2933; margin: 0; }
  header { display: flex; align-items: center; gap: 20px; border-bottom: 3px solid #6c5ce7; padding-bottom: 16px; }
  header img { width: 88px; height: 88px; border-radius: 50%; object-fit: cover; }
  h1 { margin: 0; font-size: 28px; }
  .handle { color: #6c5ce7; font-weight: 600; }
  .bio { margin: 18px 0; line-height: 1.5; }
  .stats { display: flex; gap: 12px; margin: 18px 0; }
  .stat { flex: 1; background: #f4f3ff; border-radius: 10px; padding: 14px; text-align: center; }
  .stat .value { font-size: 22px; font-weight: 700; }
  .stat .label { font-size: 12px; text-transform: uppercase; color: #52606d; }
  .quality { display: inline-block; padding: 3px 10px; border-radius: 12px; font-size: 12px; font-weight: 700; text-transform: uppercase; }
  .quality-excellent { background: #d3f9d8; color: #2b8a3e; }
  .quality-good { background: #dbe4ff; color: #364fc7; }
  .quality-average { background: #fff3bf; color: #e67700; }
  .quality-poor { background: #ffe3e3; color: #c92a2a; }
  .posts { display: grid; grid-template-columns: repeat(3, 1fr); gap: 10px; }
  .post { border: 1px solid #e4e7eb; border-radius: 8px; padding: 10px; font-size: 12px; }
  .post img { width: 100%; border-radius: 6px; }
  ul.insights li { margin-bottom: 6px; }
  footer { margin-top: 28px; font-size: 11px; color: #7b8794; border-top: 1px solid #e4e7eb; padding-top: 10px; }
"#;

/// Render the complete media kit document.
pub fn render(ctx: &RenderContext) -> String {
    let mut out = String::with_capacity(8 * 1024);

    // Writing into a String cannot fail, so the fmt::Results are ignored.
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} | Media Kit</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        escape(&ctx.full_name)
    );

    out.push_str("<header>\n");
    if let Some(avatar) = &ctx.avatar_url {
        let _ = writeln!(out, "<img src=\"{}\" alt=\"\">", escape(avatar));
    }
    let _ = writeln!(
        out,
        "<div><h1>{}</h1><div class=\"handle\">@{} · {}</div></div>",
        escape(&ctx.full_name),
        escape(&ctx.handle),
        escape(&ctx.platform),
    );
    out.push_str("</header>\n");

    let _ = writeln!(out, "<p class=\"bio\">{}</p>", escape(&ctx.bio));

    out.push_str("<section class=\"stats\">\n");
    stat(&mut out, &format_number(ctx.followers), "Followers");
    stat(&mut out, &format!("{:.2}%", ctx.engagement_rate), "Engagement rate");
    stat(&mut out, &format_number(ctx.avg_likes), "Avg likes");
    stat(&mut out, &format_number(ctx.avg_comments), "Avg comments");
    out.push_str("</section>\n");

    let _ = writeln!(
        out,
        "<p>Engagement quality: <span class=\"quality {}\">{}</span></p>",
        quality_class(ctx.quality),
        ctx.quality.as_str()
    );

    if let Some(readiness) = &ctx.readiness {
        let _ = writeln!(
            out,
            "<p>Brand readiness: <strong>{}/100</strong></p>",
            readiness.score
        );
    }

    if !ctx.insights.is_empty() {
        out.push_str("<h2>Highlights</h2>\n<ul class=\"insights\">\n");
        for insight in &ctx.insights {
            let _ = writeln!(out, "<li>{}</li>", escape(insight));
        }
        out.push_str("</ul>\n");
    }

    if !ctx.top_posts.is_empty() {
        out.push_str("<h2>Top posts</h2>\n<section class=\"posts\">\n");
        for post in &ctx.top_posts {
            out.push_str("<div class=\"post\">");
            if let Some(url) = &post.image_url {
                let _ = write!(out, "<img src=\"{}\" alt=\"\">", escape(url));
            }
            if let Some(caption) = &post.caption {
                let _ = write!(
                    out,
                    "<p>{}</p>",
                    escape(&truncate_chars(caption, CAPTION_PREVIEW_CHARS))
                );
            }
            let _ = writeln!(
                out,
                "<div>♥ {} · 💬 {}</div></div>",
                format_number(post.likes),
                format_number(post.comments)
            );
        }
        out.push_str("</section>\n");
    }

    let _ = writeln!(
        out,
        "<h2>Contact</h2>\n<p>{}</p>",
        escape(&ctx.contact_email)
    );

    let _ = writeln!(
        out,
        "<footer>Generated {}</footer>\n</body>\n</html>",
        format_date(&ctx.generated_at)
    );

    out
}

fn stat(out: &mut String, value: &str, label: &str) {
    let _ = writeln!(
        out,
        "<div class=\"stat\"><div class=\"value\">{}</div><div class=\"label\">{}</div></div>",
        escape(value),
        escape(label)
    );
}

fn quality_class(quality: EngagementQuality) -> &'static str {
    match quality {
        EngagementQuality::Excellent => "quality-excellent",
        EngagementQuality::Good => "quality-good",
        EngagementQuality::Average => "quality-average",
        EngagementQuality::Poor => "quality-poor",
    }
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
