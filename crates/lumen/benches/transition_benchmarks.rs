use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lcss::{Color, CompoundSelector, ParsedValue, PseudoClass, Rule, StyleOrigin, Stylesheet};
use lumen::{NodeId, Scene, StyleManager, StyleableNode, process_css, transition_to_state};

fn stylesheet() -> Stylesheet {
    Stylesheet::new(StyleOrigin::Author)
        .rule(
            Rule::new(CompoundSelector::of_class("root").into())
                .declare("accent", ParsedValue::Color(Color::rgb(30, 60, 90))),
        )
        .rule(
            Rule::new(CompoundSelector::of_type("Label").into())
                .declare("text-fill", ParsedValue::lookup("accent"))
                .declare("graphic-gap", ParsedValue::em(0.5))
                .declare("padding", ParsedValue::px(4.0)),
        )
        .rule(
            Rule::new(CompoundSelector::of_type("Label").pseudo(PseudoClass::HOVER).into())
                .declare("text-fill", ParsedValue::Color(Color::WHITE)),
        )
}

/// A root pane with `count` labels, styled once.
fn styled_scene(count: usize) -> (StyleManager, Scene, Vec<NodeId>) {
    let mut manager = StyleManager::default();
    let mut scene = Scene::new();
    manager.add_stylesheet(&mut scene, stylesheet());
    let root = scene.add_root(StyleableNode::region("Pane").with_class("root"));
    let labels = (0..count)
        .map(|_| scene.add_child(root, StyleableNode::labeled("Label")))
        .collect();
    process_css(&mut manager, &mut scene);
    (manager, scene, labels)
}

fn bench_fast_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("transition_fast_path");

    for count in [1, 10, 100] {
        let (mut manager, mut scene, labels) = styled_scene(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("labels", count), &labels, |b, labels| {
            b.iter(|| {
                for &label in labels {
                    transition_to_state(&mut manager, &mut scene, black_box(label));
                }
            })
        });
    }
    group.finish();
}

fn bench_hover_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("hover_toggle");

    // Both states are cached after the first two pulses.
    let (mut manager, mut scene, labels) = styled_scene(10);
    let mut hovered = false;
    group.bench_function("pulse", |b| {
        b.iter(|| {
            hovered = !hovered;
            for &label in &labels {
                scene.set_pseudo_class_state(label, PseudoClass::HOVER, hovered);
            }
            process_css(&mut manager, &mut scene);
        })
    });
    group.finish();
}

fn bench_full_restyle(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_restyle");

    for count in [10, 100] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("labels", count), &count, |b, &count| {
            b.iter(|| styled_scene(black_box(count)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fast_path, bench_hover_toggle, bench_full_restyle);
criterion_main!(benches);
