//! End-to-end rendering tests

use proptest::prelude::*;
use svg_graph::*;

fn value_labels(layout: &ChartLayout) -> Vec<(String, LayoutPoint)> {
    layout
        .elements
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Group {
                attributes,
                children,
            } if attributes
                .iter()
                .any(|(k, v)| k == "text-anchor" && *v == AttrValue::from("middle")) =>
            {
                Some(children)
            }
            _ => None,
        })
        .flatten()
        .filter_map(|c| match c {
            DrawCommand::Text { text, position, .. } => Some((text.clone(), *position)),
            _ => None,
        })
        .collect()
}

fn numeric_attributes(element: &Element, out: &mut Vec<(String, f64)>) {
    for (key, value) in element.attributes() {
        if let AttrValue::Num(n) = value {
            out.push((key.clone(), *n));
        }
    }
    for node in element.children() {
        if let Node::Element(child) = node {
            numeric_attributes(child, out);
        }
    }
}

#[test]
fn test_empty_data_renders_background_only() {
    let graph = Graph::new(Options::default())
        .with_data(Vec::<f64>::new())
        .with_labels(Vec::<String>::new());

    let doc = graph.document().unwrap();
    let root = doc.root();

    assert_eq!(root.find_all("rect").len(), 1);
    assert!(root.find_all("line").is_empty());
    assert!(root.find_all("circle").is_empty());
    assert!(root.find_all("text").is_empty());
    assert!(graph.render().is_ok());
}

#[test]
fn test_empty_data_keeps_title() {
    let options = Options::new(OptionsPatch {
        title: Some("Nothing yet".to_string()),
        ..Default::default()
    });
    let svg = Graph::new(options).render().unwrap();
    assert!(svg.contains("Nothing yet"));
}

#[test]
fn test_grouped_bar_chart() {
    let graph = Graph::new(Options::default())
        .with_data(vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]])
        .with_labels(["Jan", "Feb", "Mar"]);

    assert_eq!(graph.scale(), Scale { max: 40.0, division: 10.0 });

    let doc = graph.document().unwrap();
    assert_eq!(doc.root().find_all("rect").len(), 7);

    let texts: Vec<String> = doc.root().find_all("text").iter().map(|t| t.text_content()).collect();
    assert!(texts.contains(&"Feb".to_string()));
    assert!(texts.contains(&"30".to_string()));
    assert!(texts.contains(&"40".to_string()));
}

#[test]
fn test_flush_scale_top_label() {
    let options = Options::new(OptionsPatch {
        flush: Some(true),
        ..Default::default()
    });
    let graph =
        Graph::new(options).with_data(vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]]);
    assert_eq!(graph.scale(), Scale { max: 30.0, division: 10.0 });
}

#[test]
fn test_bars_use_color_policy() {
    let graph = Graph::new(Options::default())
        .with_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]])
        .with_colors(ColorPolicy::nested(vec![vec!["#111111", "#222222"]]).unwrap());

    let doc = graph.document().unwrap();
    let fills: Vec<String> = doc.root().find_all("rect")[1..]
        .iter()
        .filter_map(|r| r.get_attr("fill").map(|v| v.to_string()))
        .collect();
    assert_eq!(fills, vec!["#111111", "#222222", "#111111", "#222222"]);
}

#[test]
fn test_default_colors_per_slot() {
    let graph = Graph::new(Options::default()).with_data(vec![1.0, 1.0]);
    let doc = graph.document().unwrap();
    let fills: Vec<String> = doc.root().find_all("rect")[1..]
        .iter()
        .filter_map(|r| r.get_attr("fill").map(|v| v.to_string()))
        .collect();
    assert_eq!(fills, vec!["#cc0000", "#00cccc"]);
}

#[test]
fn test_legend_sorted_regardless_of_insert_order() {
    let mut legend = Legend::new();
    legend.insert("#ff0000", "Zebra");
    legend.insert("#00ff00", "Yak");
    legend.insert("#0000ff", "Xerus");

    let svg = Graph::new(Options::default())
        .with_data(vec![1.0])
        .with_legend(legend)
        .render()
        .unwrap();

    let xerus = svg.find("Xerus").unwrap();
    let yak = svg.find("Yak").unwrap();
    let zebra = svg.find("Zebra").unwrap();
    assert!(xerus < yak && yak < zebra);
}

#[test]
fn test_unknown_chart_type_rejected() {
    let mut graph = Graph::new(Options::default());
    let err = graph.update_options_json(r#"{"chartType": "pie"}"#).unwrap_err();
    assert!(matches!(err, ChartError::InvalidConfiguration(_)));
}

#[test]
fn test_non_finite_option_rejected_at_render() {
    let mut options = Options::default();
    options.viewbox.width = f64::INFINITY;
    let result = Graph::new(options).with_data(vec![1.0]).render();
    assert!(matches!(result, Err(ChartError::InvalidConfiguration(_))));
}

#[test]
fn test_unrepresentable_data_rejected_at_render() {
    for value in [1.0e308, f64::INFINITY, f64::NAN] {
        let graph = Graph::new(Options::default()).with_data(vec![1.0, value]);
        assert!(matches!(graph.layout(), Err(ChartError::InvalidConfiguration(_))));
        assert!(matches!(graph.render(), Err(ChartError::InvalidConfiguration(_))));
    }
}

#[test]
fn test_largest_accepted_value_renders() {
    let graph = Graph::new(Options::default()).with_data(vec![1.0, MAX_DATA_VALUE]);
    assert!(graph.scale().max.is_finite());
    assert!(graph.render().is_ok());
}

#[test]
fn test_compact_output() {
    let options = Options::new(OptionsPatch {
        indent: Some(0),
        ..Default::default()
    });
    let svg = Graph::new(options).with_data(vec![1.0]).render().unwrap();
    assert!(!svg.contains('\n'));
}

#[test]
fn test_percent_labels() {
    let options = Options::new(OptionsPatch {
        bar_text: Some(BarText::Percent),
        ..Default::default()
    });
    let svg = Graph::new(options)
        .with_data(vec![vec![1.0, 3.0]])
        .render()
        .unwrap();
    assert!(svg.contains(">25%</text>"));
    assert!(svg.contains(">75%</text>"));
}

proptest! {
    #[test]
    fn prop_scale_is_well_formed(
        values in prop::collection::vec(0.0f64..1.0e6, 0..20),
        flush in any::<bool>()
    ) {
        let data = SeriesData::from(values.clone());
        let scale = Scale::compute(&data, flush);
        let data_max = values.iter().cloned().fold(0.0, f64::max).max(1.0);

        // division is the greatest power of ten not above the data maximum
        prop_assert!(scale.division <= data_max);
        prop_assert!(scale.division * 10.0 > data_max);
        prop_assert!((0..=7).any(|p| 10f64.powi(p) == scale.division));

        // max is a whole, positive number of steps
        prop_assert!(scale.steps() >= 1);
        prop_assert!(((scale.max / scale.division) - scale.steps() as f64).abs() < 1e-9);

        if flush {
            prop_assert!(scale.max >= data_max);
        } else {
            prop_assert!(scale.max > data_max);
        }
    }

    #[test]
    fn prop_flush_on_exact_multiple_is_exact(power in 0u32..6, multiple in 1u32..10) {
        let division = 10f64.powi(power as i32);
        let value = division * multiple as f64;
        let scale = Scale::compute(&SeriesData::from(vec![value]), true);
        prop_assert_eq!(scale.division, division);
        prop_assert_eq!(scale.max, value);
    }

    #[test]
    fn prop_render_is_deterministic(
        groups in prop::collection::vec(prop::collection::vec(0.0f64..500.0, 1..4), 0..8),
        line in any::<bool>()
    ) {
        let options = Options::new(OptionsPatch {
            chart_type: Some(if line { ChartType::Line } else { ChartType::Bar }),
            ..Default::default()
        });
        let labels: Vec<String> = (0..groups.len()).map(|i| format!("L{}", i)).collect();
        let graph = Graph::new(options)
            .with_data(groups)
            .with_labels(labels)
            .with_legend(Legend::new().with_entry("#ff0000", "a").with_entry("#00ff00", "b"));

        let first = graph.render().unwrap();
        let second = graph.render().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_numeric_attributes_finite_and_sized(
        groups in prop::collection::vec(prop::collection::vec(0.0f64..1000.0, 1..5), 1..10),
        line in any::<bool>()
    ) {
        let options = Options::new(OptionsPatch {
            chart_type: Some(if line { ChartType::Line } else { ChartType::Bar }),
            ..Default::default()
        });
        let doc = Graph::new(options).with_data(groups).document().unwrap();

        let mut numbers = Vec::new();
        numeric_attributes(doc.root(), &mut numbers);
        for (key, value) in numbers {
            prop_assert!(value.is_finite(), "{} = {}", key, value);
            if matches!(key.as_str(), "width" | "height" | "r") {
                prop_assert!(value >= 0.0, "{} = {}", key, value);
            }
        }
    }

    #[test]
    fn prop_adjacent_labels_clear_each_other(a in 1.0f64..100.0, b in 1.0f64..100.0) {
        let graph = Graph::new(Options::default()).with_data(vec![vec![a, b]]);
        let scale = graph.scale();
        let layout = graph.layout().unwrap();
        let labels = value_labels(&layout);
        prop_assert_eq!(labels.len(), 2);

        let dy = Options::default().graph_height() * scale.division / scale.max;
        let height = |v: f64| (v * dy / scale.division).round();
        if (height(a) - height(b)).abs() < LABEL_CLEARANCE {
            prop_assert!((labels[0].1.y - labels[1].1.y).abs() >= LABEL_CLEARANCE - 1e-9);
        }
    }

    #[test]
    fn prop_default_hues_distinct(n in 1usize..24) {
        let policy = ColorPolicy::default();
        let mut colors: Vec<String> = (0..n).map(|i| policy.resolve(i, 0, n, 1)).collect();
        colors.sort();
        colors.dedup();
        prop_assert_eq!(colors.len(), n);
    }
}
