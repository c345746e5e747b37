//! 페이지 렌더링.
//!
//! 템플릿 엔진 없이 `format!`으로 조립하는 단일 페이지.
//! 사용자 유래 텍스트는 반드시 이스케이프한다.

use glassware_core::dispatch::RenderData;
use glassware_core::models::contact::WELL_KNOWN_CONTACT_ID;

/// 잘 알려진 연락처 표시 이름
const WELL_KNOWN_CONTACT_NAME: &str = "Rust Quick Start";

/// HTML 특수문자 이스케이프
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 메인 페이지 렌더
pub fn render_page(base_url: &str, message: &str, data: &RenderData) -> String {
    let status = if message.is_empty() {
        String::new()
    } else {
        format!(
            r#"<span class="label label-warning">Message: {}</span>"#,
            escape_html(message)
        )
    };

    let timeline: String = data
        .timeline
        .iter()
        .map(|item| {
            let id = escape_html(item.id.as_deref().unwrap_or(""));
            let text = escape_html(item.text.as_deref().unwrap_or(""));
            let attachments = item
                .attachments
                .iter()
                .map(|att| format!(r#"<li>attachment: {}</li>"#, escape_html(&att.id)))
                .collect::<String>();
            format!(
                r#"<ul class="tile"><li><strong>ID:</strong> {id}</li><li><strong>Text:</strong> {text}</li>{attachments}</ul>"#
            )
        })
        .collect();

    let contact_section = if data.contact.is_none() {
        format!(
            r#"<form method="post">
  <input type="hidden" name="operation" value="insertContact">
  <input type="hidden" name="id" value="{WELL_KNOWN_CONTACT_ID}">
  <input type="hidden" name="name" value="{WELL_KNOWN_CONTACT_NAME}">
  <button class="btn" type="submit">Insert {WELL_KNOWN_CONTACT_NAME} Contact</button>
</form>"#
        )
    } else {
        format!(
            r#"<form method="post">
  <input type="hidden" name="operation" value="deleteContact">
  <input type="hidden" name="id" value="{WELL_KNOWN_CONTACT_ID}">
  <button class="btn" type="submit">Delete {WELL_KNOWN_CONTACT_NAME} Contact</button>
</form>"#
        )
    };

    let timeline_toggle = subscription_toggle("timeline", data.flags.timeline_subscribed);
    let location_toggle = subscription_toggle("location", data.flags.location_subscribed);

    let picture_url = format!("{base_url}/static/images/chipotle-tube-640x360.jpg");

    format!(
        r##"<!doctype html>
<html>
<head>
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Glassware Starter Project</title>
  <style>
    .tile {{ border-left: 1px solid #444; padding: 5px; list-style: none; }}
    .btn {{ width: 100%; }}
  </style>
</head>
<body>
<div class="navbar">
  <a class="brand" href="#">Glassware Starter Project: Rust Edition</a>
  <form action="/signout" method="post"><button type="submit" class="btn">Sign out</button></form>
</div>

<div class="container">
  <div class="hero-unit">
    <h1>Your Recent Timeline</h1>
    {status}
    <div>{timeline}</div>
  </div>

  <div class="row">
    <div class="span4">
      <h2>Timeline</h2>
      <form method="post">
        <input type="hidden" name="operation" value="insertItem">
        <textarea name="message">Hello World!</textarea><br/>
        <button class="btn" type="submit">The above message</button>
      </form>
      <form method="post">
        <input type="hidden" name="operation" value="insertItem">
        <input type="hidden" name="message" value="Chipotle says hi!">
        <input type="hidden" name="imageUrl" value="{picture_url}">
        <input type="hidden" name="contentType" value="image/jpeg">
        <button class="btn" type="submit">A picture</button>
      </form>
      <form method="post">
        <input type="hidden" name="operation" value="insertItemWithAction">
        <button class="btn" type="submit">A card you can reply to</button>
      </form>
      <hr>
      <form method="post">
        <input type="hidden" name="operation" value="insertTimelineAllUsers">
        <button class="btn" type="submit">A card to all users</button>
      </form>
    </div>

    <div class="span4">
      <h2>Contacts</h2>
      {contact_section}
    </div>

    <div class="span4">
      <h2>Subscriptions</h2>
      <p class="label label-info">Note: Subscriptions require SSL. They will not work on localhost.</p>
      {timeline_toggle}
      {location_toggle}
    </div>
  </div>
</div>
</body>
</html>"##
    )
}

/// 구독 상태에 따른 subscribe/unsubscribe 폼
fn subscription_toggle(collection: &str, subscribed: bool) -> String {
    if subscribed {
        format!(
            r#"<form method="post">
  <input type="hidden" name="subscriptionId" value="{collection}">
  <input type="hidden" name="operation" value="deleteSubscription">
  <button class="btn" type="submit">Unsubscribe from {collection} updates</button>
</form>"#
        )
    } else {
        format!(
            r#"<form method="post">
  <input type="hidden" name="operation" value="insertSubscription">
  <input type="hidden" name="subscriptionId" value="{collection}">
  <button class="btn" type="submit">Subscribe to {collection} updates</button>
</form>"#
        )
    }
}
