//! Subscriber listing of the coordination service status page.

use serde::{Deserialize, Serialize};

use crate::template::{Context, Template, TemplateError};

/// HTML fragment listing every registered subscriber.
pub const SUBSCRIBERS_TEMPLATE: &str = r#"<h2>Subscribers ({{num_subscribers}})</h2>
<table class="table table-bordered table-hover">
  <tr>
    <th>Id</th>
    <th>Address</th>
    <th>Subscribed topics</th>
    <th>Subscribed priority topics</th>
    <th>Seconds since last heartbeat</th>
  </tr>
{{#subscribers}}
  <tr>
    <td>{{id}}</td>
    <td>{{address}}</td>
    <td>{{num_topics}}</td>
    <td>{{num_priority_topics}}</td>
    <td>{{secs_since_heartbeat}}</td>
  </tr>
{{/subscribers}}
</table>
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriberRow {
    pub id: String,
    pub address: String,
    pub num_topics: u32,
    #[serde(default)]
    pub num_priority_topics: u32,
    pub secs_since_heartbeat: f64,
}

impl SubscriberRow {
    fn to_context(&self) -> Context {
        let mut ctx = Context::new();
        ctx.set("id", &self.id)
            .set("address", &self.address)
            .set("num_topics", self.num_topics)
            .set("num_priority_topics", self.num_priority_topics)
            .set(
                "secs_since_heartbeat",
                format!("{:.3}", self.secs_since_heartbeat),
            );
        ctx
    }
}

pub fn render_subscribers(rows: &[SubscriberRow]) -> Result<String, TemplateError> {
    let template = Template::parse(SUBSCRIBERS_TEMPLATE)?;
    let mut ctx = Context::new();
    ctx.set("num_subscribers", rows.len());
    for row in rows {
        ctx.push_row("subscribers", row.to_context());
    }
    template.render(&ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, age: f64) -> SubscriberRow {
        SubscriberRow {
            id: id.to_string(),
            address: format!("{id}.cluster:23000"),
            num_topics: 3,
            num_priority_topics: 1,
            secs_since_heartbeat: age,
        }
    }

    #[test]
    fn test_render_lists_every_subscriber() {
        let page = render_subscribers(&[row("impalad-1", 0.5), row("catalogd", 12.0)]).unwrap();
        assert!(page.starts_with("<h2>Subscribers (2)</h2>"));
        assert_eq!(page.matches("<td>3</td>").count(), 2);
        assert!(page.contains("<td>impalad-1.cluster:23000</td>"));
        assert!(page.contains("<td>0.500</td>"));
        assert!(page.contains("<td>12.000</td>"));
        let first = page.find("impalad-1").unwrap();
        let second = page.find("catalogd").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_empty_table() {
        let page = render_subscribers(&[]).unwrap();
        assert!(page.contains("Subscribers (0)"));
        assert!(!page.contains("<td>"));
        assert!(page.trim_end().ends_with("</table>"));
    }

    #[test]
    fn test_row_from_json_defaults_priority_topics() {
        let rows: Vec<SubscriberRow> = serde_json::from_str(
            r#"[{"id":"s1","address":"h:1","num_topics":4,"secs_since_heartbeat":1.5}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].num_priority_topics, 0);
        assert_eq!(rows[0].num_topics, 4);
    }
}
