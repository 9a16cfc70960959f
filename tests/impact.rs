mod common;

use std::path::{Path, PathBuf};

use common::{index, index_with_run, FaultyResolver, Faults, MAIN, SHAPES};
use impact::graph::{edge_kind_writer, to_dot, ReferenceWriter, VertexId};
use impact::resolver::{Position, SymbolKind};
use impact::{
    analyze, EdgeKind, ImpactAnalyzer, ImpactError, ImpactOptions, ImpactRequest, ReferenceGraph,
    Referencer,
};

fn by_name(name: &str) -> ImpactRequest {
    ImpactRequest {
        names: vec![name.to_string()],
        ..Default::default()
    }
}

/// Ids of the vertices named `name`.
fn ids(graph: &ReferenceGraph, name: &str) -> Vec<VertexId> {
    graph
        .vertices()
        .filter(|(_, r)| r.name == name)
        .map(|(id, _)| id)
        .collect()
}

/// `geo::run` as declared in shapes.cpp.
fn run_declaration(graph: &ReferenceGraph) -> VertexId {
    graph
        .vertices()
        .find(|(_, r)| r.name == "run" && r.name_range.start == Position::new(13, 5))
        .map(|(id, _)| id)
        .unwrap()
}

fn single(graph: &ReferenceGraph, name: &str) -> VertexId {
    let found = ids(graph, name);
    assert_eq!(found.len(), 1, "expected one {name}, found {}", found.len());
    found[0]
}

#[test]
fn test_call_impact_end_to_end() {
    let referencer = Referencer::new(index());
    let options = ImpactOptions {
        follow_calls: true,
        ..Default::default()
    };
    let graph = analyze(&referencer, options, &by_name("draw")).unwrap();

    let in_file = |file: &str| {
        graph
            .vertices()
            .find(|(_, r)| r.name == "draw" && r.uri == Path::new(file))
            .map(|(id, _)| id)
            .unwrap()
    };
    // Declaration in shapes.cpp, usage in main.cpp.
    let draw = in_file(SHAPES);
    let usage = in_file(MAIN);
    assert_eq!(ids(&graph, "draw").len(), 2);

    let main = single(&graph, "main");
    let file = graph
        .find_vertex(&impact::Reference::file(SHAPES))
        .unwrap();

    assert_eq!(graph.edge(draw, usage), Some(&EdgeKind::Solid));
    assert_eq!(graph.edge(draw, file), Some(&EdgeKind::Dashed));
    assert_eq!(graph.edge(main, draw), Some(&EdgeKind::Dashed));

    let solid = graph
        .edges()
        .filter(|(_, kind)| **kind == EdgeKind::Solid)
        .count();
    assert_eq!(solid, 1);
}

#[test]
fn test_repeated_symbols_collapse() {
    let referencer = Referencer::new(index());
    let options = ImpactOptions {
        follow_calls: true,
        ..Default::default()
    };
    let request = ImpactRequest {
        names: vec!["draw".to_string(), "area".to_string()],
        locations: vec![(PathBuf::from(SHAPES), Position::new(8, 6))],
        ..Default::default()
    };
    let graph = analyze(&referencer, options, &request).unwrap();

    // draw is reached as a caller of area, by name and by location.
    single(&graph, "main");
    assert_eq!(
        graph
            .vertices()
            .filter(|(_, r)| r.name == "draw" && r.uri == Path::new(SHAPES))
            .count(),
        1
    );
}

#[test]
fn test_recursion_terminates() {
    let referencer = Referencer::new(index());
    let options = ImpactOptions {
        follow_calls: true,
        ..Default::default()
    };
    let request = ImpactRequest {
        locations: vec![(PathBuf::from(MAIN), Position::new(0, 6))],
        ..Default::default()
    };
    let graph = analyze(&referencer, options, &request).unwrap();

    let ping = graph
        .vertices()
        .filter(|(_, r)| r.name == "ping" && r.name_range.start == Position::new(0, 5))
        .count();
    assert_eq!(ping, 1);
    assert!(!ids(&graph, "pong").is_empty());
}

#[test]
fn test_diamond_collapses_to_one_vertex() {
    let referencer = Referencer::new(index());
    let options = ImpactOptions {
        follow_subtypes: true,
        ..Default::default()
    };
    let graph = analyze(&referencer, options, &by_name("Base")).unwrap();

    let bottom = single(&graph, "Bottom");
    let left = single(&graph, "Left");
    let right = single(&graph, "Right");
    let base = single(&graph, "Base");
    assert!(graph.has_edge(base, left));
    assert!(graph.has_edge(base, right));
    assert!(graph.has_edge(left, bottom));
    assert!(graph.has_edge(right, bottom));
}

#[test]
fn test_file_level_output() {
    let referencer = Referencer::new(index());
    let options = ImpactOptions {
        follow_calls: true,
        file_level_only: true,
        ..Default::default()
    };
    let graph = analyze(&referencer, options, &by_name("draw")).unwrap();

    assert_eq!(graph.vertex_count(), 2);
    assert!(graph.vertices().all(|(_, r)| r.kind == SymbolKind::File));
    assert!(graph.edges().all(|((s, t), _)| s != t));

    let shapes = graph.find_vertex(&impact::Reference::file(SHAPES)).unwrap();
    let main = graph.find_vertex(&impact::Reference::file(MAIN)).unwrap();
    assert!(graph.has_edge(main, shapes));
}

// ─── Partial Failure ────────────────────────────────────────────

#[test]
fn test_failing_file_does_not_abort_query() {
    let faults = Faults {
        files: vec![PathBuf::from(MAIN)],
        ..Default::default()
    };
    let referencer = Referencer::new(FaultyResolver::new(index(), faults));
    let request = ImpactRequest {
        files: vec![PathBuf::from(SHAPES), PathBuf::from(MAIN)],
        names: vec!["ping".to_string()],
        ..Default::default()
    };
    let graph = analyze(&referencer, ImpactOptions::default(), &request).unwrap();

    assert!(!graph.is_empty());
    assert!(graph.vertices().all(|(_, r)| r.uri == Path::new(SHAPES)));
    single(&graph, "Shape");
}

#[test]
fn test_failing_name_hit_keeps_the_others() {
    let faults = Faults {
        files: vec![PathBuf::from(MAIN)],
        ..Default::default()
    };
    let referencer = Referencer::new(FaultyResolver::new(index_with_run(), faults));
    let graph = analyze(&referencer, ImpactOptions::default(), &by_name("run")).unwrap();

    // geo::run and its two usages in shapes.cpp; the main.cpp run and usage are lost.
    assert_eq!(ids(&graph, "run").len(), 3);
    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.vertices().all(|(_, r)| r.uri == Path::new(SHAPES)));
}

#[test]
fn test_failing_usage_keeps_declaration_and_other_usages() {
    let referencer = Referencer::new(index_with_run());
    let graph = analyze(&referencer, ImpactOptions::default(), &by_name("geo::run")).unwrap();
    assert_eq!(graph.vertex_count(), 4);

    let faults = Faults {
        files: vec![PathBuf::from(MAIN)],
        ..Default::default()
    };
    let referencer = Referencer::new(FaultyResolver::new(index_with_run(), faults));
    let graph = analyze(&referencer, ImpactOptions::default(), &by_name("geo::run")).unwrap();

    let declaration = run_declaration(&graph);
    assert_eq!(graph.vertex_count(), 3);
    let usages = graph
        .edges()
        .filter(|((source, _), _)| *source == declaration)
        .count();
    assert_eq!(usages, 2);
}

#[test]
fn test_failing_caller_keeps_the_hierarchy() {
    let faults = Faults {
        files: vec![PathBuf::from(MAIN)],
        ..Default::default()
    };
    let referencer = Referencer::new(FaultyResolver::new(index_with_run(), faults));
    let options = ImpactOptions {
        follow_calls: true,
        ..Default::default()
    };
    let graph = analyze(&referencer, options, &by_name("geo::run")).unwrap();

    // draw calls geo::run from shapes.cpp; main sits in the failing file.
    let draw = single(&graph, "draw");
    let run = run_declaration(&graph);
    assert_eq!(graph.edge(draw, run), Some(&EdgeKind::Dashed));
    assert!(ids(&graph, "main").is_empty());
}

#[test]
fn test_failing_hierarchies_keep_the_rest() {
    let faults = Faults {
        hierarchies: true,
        ..Default::default()
    };
    let referencer = Referencer::new(FaultyResolver::new(index(), faults));
    let options = ImpactOptions {
        follow_calls: true,
        follow_supertypes: true,
        ..Default::default()
    };
    let graph = analyze(&referencer, options, &by_name("area")).unwrap();

    // Usages and containment survive; callers are gone.
    assert_eq!(ids(&graph, "area").len(), 3);
    single(&graph, "Shape");
    assert!(ids(&graph, "draw").is_empty());
}

#[test]
fn test_nothing_obtainable_is_no_results() {
    let faults = Faults {
        files: vec![PathBuf::from(MAIN)],
        ..Default::default()
    };
    let referencer = Referencer::new(FaultyResolver::new(index(), faults));
    let request = ImpactRequest {
        files: vec![PathBuf::from(MAIN)],
        locations: vec![(PathBuf::from(SHAPES), Position::new(3, 0))],
        ..Default::default()
    };
    assert!(matches!(
        analyze(&referencer, ImpactOptions::default(), &request),
        Err(ImpactError::NoResults)
    ));
}

#[test]
fn test_adjust_graph_is_identity_without_file_level() {
    let referencer = Referencer::new(index());
    let analyzer = ImpactAnalyzer::new(&referencer, ImpactOptions::default());
    let graph = analyzer.build_graph(&by_name("area")).unwrap();
    let (vertices, edges) = (graph.vertex_count(), graph.edge_count());
    let adjusted = analyzer.adjust_graph(graph);
    assert_eq!(adjusted.vertex_count(), vertices);
    assert_eq!(adjusted.edge_count(), edges);
}

// ─── Output ─────────────────────────────────────────────────────

#[test]
fn test_dot_output_of_impact_graph() {
    let referencer = Referencer::new(index());
    let options = ImpactOptions {
        follow_calls: true,
        ..Default::default()
    };
    let graph = analyze(&referencer, options, &by_name("area")).unwrap();

    let writer = ReferenceWriter::new(Some(PathBuf::from("/ws")));
    let dot = to_dot(&graph, |id, r| writer.write(id, r), edge_kind_writer);

    assert!(dot.starts_with("digraph {\n"));
    assert!(dot.ends_with("}\n"));
    assert!(dot.contains(">src/shapes.cpp<"));
    assert!(!dot.contains(">/ws/src/shapes.cpp<"));
    assert!(dot.contains("[style=\"solid\"];"));
    assert!(dot.contains("[style=\"dashed\"];"));

    let edge_lines = dot.lines().filter(|l| l.contains(" -> ")).count();
    assert_eq!(edge_lines, graph.edge_count());
}
