//! Rendering adapter for vis-network
//!
//! Turns a [`FamilyGraph`] into plain node and edge lists with labels,
//! tooltips and styles, serializable as JSON or wrapped in a standalone HTML
//! page.

use crate::graph::{EdgeKind, FamilyGraph, FamilyNode};
use crate::GraphError;
use kinship_domain::{Gender, Person};
use serde::Serialize;

/// How node labels are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStyle {
    /// First names only, e.g. `Rama & Sita`
    #[default]
    Plain,
    /// Full names, life spans and marriage year using vis-network's
    /// `multi: html` markup
    Html,
}

/// A node ready for vis-network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisNode {
    /// Node id (`3` or `1_2`)
    pub id: String,
    /// Text drawn in the box
    pub label: String,
    /// Hover tooltip
    pub title: String,
    /// Node shape
    pub shape: &'static str,
}

/// An edge ready for vis-network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisEdge {
    /// Source node id
    pub from: String,
    /// Target node id
    pub to: String,
    /// Edge label
    pub label: String,
    /// Arrow placement
    pub arrows: &'static str,
    /// Dashed line
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dashes: bool,
    /// Line color override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

/// Rendered node and edge lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedGraph {
    /// Nodes in graph order
    pub nodes: Vec<VisNode>,
    /// Edges in graph order
    pub edges: Vec<VisEdge>,
}

/// Render every node and edge of `graph`
///
/// # Examples
///
/// ```
/// use kinship_domain::{FamilyRecords, NewPerson};
/// use kinship_graph::{render, GraphBuilder, LabelStyle};
///
/// let mut records = FamilyRecords::new();
/// let rama = records.add_person(NewPerson::named("Rama")).unwrap();
/// let sita = records.add_person(NewPerson::named("Sita")).unwrap();
/// records.add_spouse(rama, sita);
///
/// let graph = GraphBuilder::new().build(&records).unwrap();
/// let rendered = render(&graph, LabelStyle::Plain);
/// assert_eq!(rendered.nodes[0].label, "Rama & Sita");
/// ```
pub fn render(graph: &FamilyGraph, style: LabelStyle) -> RenderedGraph {
    let nodes = graph
        .nodes()
        .map(|node| VisNode {
            id: node.node_id().to_string(),
            label: match style {
                LabelStyle::Plain => plain_label(node),
                LabelStyle::Html => html_label(node),
            },
            title: tooltip(node),
            shape: "box",
        })
        .collect();

    let edges = graph
        .edges()
        .into_iter()
        .map(|edge| {
            let (dashes, color) = match edge.kind {
                EdgeKind::Parent => (false, None),
                EdgeKind::Spouse => (true, Some("purple")),
            };
            VisEdge {
                from: edge.from.to_string(),
                to: edge.to.to_string(),
                label: edge.kind.to_string(),
                arrows: "to",
                dashes,
                color,
            }
        })
        .collect();

    RenderedGraph { nodes, edges }
}

impl RenderedGraph {
    /// Pretty-printed JSON of the node and edge lists
    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Standalone HTML page drawing the graph with vis-network
    pub fn to_html(&self, title: &str) -> Result<String, GraphError> {
        let nodes = script_safe(serde_json::to_string(&self.nodes)?);
        let edges = script_safe(serde_json::to_string(&self.edges)?);

        Ok(PAGE_TEMPLATE
            .replace("{{title}}", &escape_html(title))
            .replace("{{options}}", NETWORK_OPTIONS)
            .replace("{{nodes}}", &nodes)
            .replace("{{edges}}", &edges))
    }
}

fn first_name(person: &Option<Person>) -> &str {
    person.as_ref().map(|p| p.firstname.as_str()).unwrap_or("")
}

fn gender_of(person: &Option<Person>) -> &'static str {
    person.as_ref().map(|p| p.gender_str()).unwrap_or("")
}

fn plain_label(node: &FamilyNode) -> String {
    match node {
        FamilyNode::Individual { id, person } => {
            let name = first_name(person);
            if name.is_empty() {
                id.to_string()
            } else {
                name.to_string()
            }
        }
        FamilyNode::Couple { first, second, .. } => {
            format!("{} & {}", first_name(first), first_name(second))
        }
    }
}

fn html_label(node: &FamilyNode) -> String {
    match node {
        FamilyNode::Individual { id, person } => match person {
            Some(p) => person_block(p),
            None => format!("<b>{}</b>", id),
        },
        FamilyNode::Couple {
            first, second, ..
        } => {
            let mut lines = Vec::new();
            for member in [first, second] {
                match member {
                    Some(p) => lines.push(person_block(p)),
                    None => lines.push("<b>?</b>".to_string()),
                }
            }
            let year = [first, second]
                .into_iter()
                .flatten()
                .map(|p| p.marriage_year.as_str())
                .find(|y| !y.is_empty());
            if let Some(year) = year {
                lines.push(format!("<i>Married {}</i>", year));
            }
            lines.join("\n")
        }
    }
}

fn person_block(person: &Person) -> String {
    let mut block = format!("<b>{}</b>", person.full_name());
    let birth = person.birth_year.trim();
    let death = person.death_year.trim();
    if !birth.is_empty() || !death.is_empty() {
        block.push_str(&format!("\n{} - {}", birth, death));
    }
    block
}

fn tooltip(node: &FamilyNode) -> String {
    match node {
        FamilyNode::Individual { person, .. } => {
            format!("{} Gender: {}", first_name(person), gender_of(person))
        }
        FamilyNode::Couple { first, second, .. } => {
            let genders = (
                first.as_ref().and_then(|p| p.gender),
                second.as_ref().and_then(|p| p.gender),
            );
            let husband_wife = match genders {
                (Some(Gender::Male), Some(Gender::Female)) => Some((first, second)),
                (Some(Gender::Female), Some(Gender::Male)) => Some((second, first)),
                _ => None,
            };
            match husband_wife {
                Some((husband, wife)) => format!(
                    "{} W/O {} Husband: {} ({}) Wife: {} ({})",
                    first_name(wife),
                    first_name(husband),
                    first_name(husband),
                    gender_of(husband),
                    first_name(wife),
                    gender_of(wife)
                ),
                None => format!(
                    "{} & {} {} ({}) {} ({})",
                    first_name(first),
                    first_name(second),
                    first_name(first),
                    gender_of(first),
                    first_name(second),
                    gender_of(second)
                ),
            }
        }
    }
}

/// Keep embedded JSON from closing the surrounding script tag
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const NETWORK_OPTIONS: &str = r##"{
  "layout": {
    "hierarchical": {
      "enabled": true,
      "direction": "UD",
      "sortMethod": "directed",
      "nodeSpacing": 250,
      "levelSeparation": 200
    }
  },
  "interaction": {
    "dragNodes": true,
    "dragView": true,
    "zoomView": true,
    "multiselect": true,
    "navigationButtons": true,
    "keyboard": true,
    "tooltipDelay": 200,
    "hover": true,
    "selectConnectedEdges": true
  },
  "manipulation": { "enabled": false },
  "physics": { "enabled": false },
  "nodes": {
    "shape": "box",
    "color": {
      "background": "#ffffff",
      "border": "#1565c0",
      "highlight": { "background": "#e3f2fd", "border": "#0d47a1" }
    },
    "font": {
      "color": "#212121",
      "size": 22,
      "face": "Segoe UI, Arial, sans-serif",
      "multi": "html"
    },
    "margin": 20
  },
  "edges": {
    "color": { "color": "#1976d2", "highlight": "#0d47a1" },
    "font": {
      "color": "#1976d2",
      "size": 18,
      "face": "Segoe UI, Arial, sans-serif",
      "align": "middle"
    },
    "arrows": { "to": { "enabled": true, "scaleFactor": 1.2 } },
    "smooth": { "type": "cubicBezier" }
  },
  "configure": { "enabled": false }
}"##;

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{title}}</title>
<script src="https://unpkg.com/vis-network/standalone/umd/vis-network.min.js"></script>
<style>
  body { margin: 0; font-family: "Segoe UI", Arial, sans-serif; }
  #family-tree { width: 100%; height: 700px; border: 1px solid #e0e0e0; }
</style>
</head>
<body>
<div id="family-tree"></div>
<script>
  var nodes = new vis.DataSet({{nodes}});
  var edges = new vis.DataSet({{edges}});
  var container = document.getElementById("family-tree");
  var options = {{options}};
  var network = new vis.Network(container, { nodes: nodes, edges: edges }, options);
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphBuilder;
    use kinship_domain::{FamilyRecords, NewPerson};

    fn couple(first_gender: Option<Gender>, second_gender: Option<Gender>) -> FamilyRecords {
        let mut records = FamilyRecords::new();
        let a = records.add_person(NewPerson {
            firstname: "Rama".to_string(),
            gender: first_gender,
            ..NewPerson::default()
        }).unwrap();
        let b = records.add_person(NewPerson {
            firstname: "Sita".to_string(),
            gender: second_gender,
            ..NewPerson::default()
        }).unwrap();
        records.add_spouse(a, b);
        records
    }

    fn rendered(records: &FamilyRecords, style: LabelStyle) -> RenderedGraph {
        render(&GraphBuilder::new().build(records).unwrap(), style)
    }

    #[test]
    fn test_husband_wife_tooltip() {
        let out = rendered(&couple(Some(Gender::Male), Some(Gender::Female)), LabelStyle::Plain);
        assert_eq!(
            out.nodes[0].title,
            "Sita W/O Rama Husband: Rama (Male) Wife: Sita (Female)"
        );
    }

    #[test]
    fn test_wife_listed_first_tooltip() {
        let out = rendered(&couple(Some(Gender::Female), Some(Gender::Male)), LabelStyle::Plain);
        assert_eq!(
            out.nodes[0].title,
            "Rama W/O Sita Husband: Sita (Male) Wife: Rama (Female)"
        );
    }

    #[test]
    fn test_other_couple_tooltip() {
        let out = rendered(&couple(Some(Gender::Other), None), LabelStyle::Plain);
        assert_eq!(out.nodes[0].title, "Rama & Sita Rama (Other) Sita ()");
    }

    #[test]
    fn test_individual_tooltip_and_label() {
        let mut records = FamilyRecords::new();
        records.add_person(NewPerson {
            firstname: "Luv".to_string(),
            gender: Some(Gender::Male),
            ..NewPerson::default()
        }).unwrap();
        let out = rendered(&records, LabelStyle::Plain);
        assert_eq!(out.nodes[0].label, "Luv");
        assert_eq!(out.nodes[0].title, "Luv Gender: Male");
    }

    #[test]
    fn test_blank_node_label_falls_back_to_id() {
        let mut records = FamilyRecords::new();
        let rama = records.add_person(NewPerson::named("Rama")).unwrap();
        records.add_parent(rama, kinship_domain::PersonId::new(42));

        let graph = GraphBuilder::lenient().build(&records).unwrap();
        let out = render(&graph, LabelStyle::Plain);
        let blank = out.nodes.iter().find(|n| n.id == "42").unwrap();
        assert_eq!(blank.label, "42");
    }

    #[test]
    fn test_html_label_for_couple() {
        let mut records = FamilyRecords::new();
        let rama = records.add_person(NewPerson {
            firstname: "Rama".to_string(),
            surname: "Raghav".to_string(),
            birth_year: "1900".to_string(),
            death_year: "1970".to_string(),
            marriage_year: "1925".to_string(),
            ..NewPerson::default()
        }).unwrap();
        let sita = records.add_person(NewPerson::named("Sita")).unwrap();
        records.add_spouse(rama, sita);

        let out = rendered(&records, LabelStyle::Html);
        assert_eq!(
            out.nodes[0].label,
            "<b>Rama Raghav</b>\n1900 - 1970\n<b>Sita</b>\n<i>Married 1925</i>"
        );
    }

    #[test]
    fn test_parent_edge_style() {
        let mut records = FamilyRecords::new();
        let rama = records.add_person(NewPerson::named("Rama")).unwrap();
        let luv = records.add_person(NewPerson::named("Luv")).unwrap();
        records.add_parent(rama, luv);

        let out = rendered(&records, LabelStyle::Plain);
        assert_eq!(out.edges.len(), 1);
        assert_eq!(out.edges[0].label, "parent");
        assert!(!out.edges[0].dashes);
        assert_eq!(out.edges[0].color, None);

        let json = serde_json::to_value(&out.edges[0]).unwrap();
        assert!(json.get("dashes").is_none());
        assert!(json.get("color").is_none());
    }

    #[test]
    fn test_html_page_embeds_data() {
        let out = rendered(&couple(None, None), LabelStyle::Plain);
        let html = out.to_html("Family <Tree>").unwrap();

        assert!(html.contains("<title>Family &lt;Tree&gt;</title>"));
        assert!(html.contains("\"label\":\"Rama & Sita\""));
        assert!(html.contains("\"direction\": \"UD\""));
        assert!(!html.contains("{{nodes}}"));
    }

    #[test]
    fn test_script_safe() {
        assert_eq!(script_safe("\"</script>\"".to_string()), "\"<\\/script>\"");
    }
}
