//! Tests for the vertex and edge set views.

use std::sync::atomic::{AtomicU64, Ordering};

use super::SynchronizedGraph;
use crate::error::Error;
use crate::graph::{EdgeId, SimpleGraph};

fn build_test_graph() -> SynchronizedGraph<SimpleGraph<u32>> {
    let graph = SynchronizedGraph::new(SimpleGraph::directed());
    for v in 1..=3 {
        graph.add_vertex(v);
    }
    graph.add_edge(&1, &2).unwrap();
    graph.add_edge(&2, &3).unwrap();
    graph
}

#[test]
fn test_vertex_view_is_live() {
    let graph = build_test_graph();
    let vertices = graph.vertex_set();

    assert_eq!(vertices.len(), 3);
    assert!(vertices.contains(&2));

    graph.add_vertex(4);
    assert_eq!(vertices.len(), 4);
    assert!(vertices.contains(&4));

    graph.remove_vertex(&2);
    assert!(!vertices.contains(&2));
    assert_eq!(vertices.to_vec(), vec![1, 3, 4]);
}

#[test]
fn test_edge_view_is_live() {
    let graph = build_test_graph();
    let edges = graph.edge_set();

    assert_eq!(edges.len(), 2);
    graph.remove_edge(&EdgeId::new(0));
    assert_eq!(edges.len(), 1);
    assert!(!edges.contains(&EdgeId::new(0)));
    assert!(edges.contains(&EdgeId::new(1)));
}

#[test]
fn test_empty_view() {
    let graph = SynchronizedGraph::new(SimpleGraph::<u32>::directed());
    assert!(graph.vertex_set().is_empty());
    assert!(graph.edge_set().is_empty());
    assert_eq!(graph.vertex_set().iter().count(), 0);
}

#[test]
fn test_contains_all() {
    let graph = build_test_graph();
    let vertices = graph.vertex_set();

    assert!(vertices.contains_all(&[1, 3]));
    assert!(!vertices.contains_all(&[1, 9]));
    assert!(vertices.contains_all(&Vec::<u32>::new()));
}

#[test]
fn test_snapshot_reused_until_mutation() {
    let graph = build_test_graph();
    let vertices = graph.vertex_set();

    assert!(!graph.vertex_snapshot.is_built());
    let first = vertices.snapshot();
    let second = vertices.snapshot();
    assert!(first.ptr_eq(&second));

    graph.add_vertex(4);
    assert!(!graph.vertex_snapshot.is_built());
    let third = vertices.snapshot();
    assert!(!first.ptr_eq(&third));
    assert_eq!(first.to_vec(), vec![1, 2, 3]);
    assert_eq!(third.to_vec(), vec![1, 2, 3, 4]);
}

#[test]
fn test_views_invalidate_independently() {
    let graph = build_test_graph();
    let _ = graph.vertex_set().snapshot();
    let _ = graph.edge_set().snapshot();

    // A new edge leaves the vertex snapshot alone.
    graph.add_edge(&3, &1).unwrap();
    assert!(graph.vertex_snapshot.is_built());
    assert!(!graph.edge_snapshot.is_built());

    let _ = graph.edge_set().snapshot();

    // A new vertex leaves the edge snapshot alone.
    graph.add_vertex(9);
    assert!(!graph.vertex_snapshot.is_built());
    assert!(graph.edge_snapshot.is_built());
}

#[test]
fn test_vertex_removal_invalidates_both_snapshots() {
    let graph = build_test_graph();
    let _ = graph.vertex_set().snapshot();
    let _ = graph.edge_set().snapshot();

    graph.remove_vertex(&2);
    assert!(!graph.vertex_snapshot.is_built());
    assert!(!graph.edge_snapshot.is_built());
    assert!(graph.edge_set().iter().next().is_none());
}

#[test]
fn test_failed_mutation_keeps_snapshot() {
    let graph = build_test_graph();
    let _ = graph.vertex_set().snapshot();
    let _ = graph.edge_set().snapshot();

    assert!(!graph.add_vertex(1));
    assert!(graph.add_edge(&1, &2).unwrap().is_none());
    assert!(!graph.remove_edge(&EdgeId::new(42)));

    assert!(graph.vertex_snapshot.is_built());
    assert!(graph.edge_snapshot.is_built());
}

#[test]
fn test_iteration_survives_mutation() {
    let graph = build_test_graph();
    let mut seen = Vec::new();

    for v in &graph.vertex_set() {
        // The iterator owns its snapshot, so writes here cannot disturb it.
        graph.add_vertex(v + 10);
        seen.push(v);
    }

    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(graph.vertex_set().len(), 6);
}

#[test]
fn test_view_mutators_fail_and_leave_graph_unchanged() {
    let graph = build_test_graph();
    let vertices = graph.vertex_set();
    let edges = graph.edge_set();

    assert!(matches!(
        vertices.insert(7),
        Err(Error::UnsupportedOperation(_))
    ));
    assert!(matches!(
        vertices.remove(&1),
        Err(Error::UnsupportedOperation(_))
    ));
    assert!(matches!(vertices.clear(), Err(Error::UnsupportedOperation(_))));
    assert!(matches!(
        vertices.retain(|_| false),
        Err(Error::UnsupportedOperation(_))
    ));
    assert!(matches!(
        edges.remove(&EdgeId::new(0)),
        Err(Error::UnsupportedOperation(_))
    ));

    assert_eq!(vertices.len(), 3);
    assert_eq!(edges.len(), 2);
    assert!(!graph.contains_vertex(&7));
}

#[test]
fn test_for_each_visits_live_set() {
    let graph = build_test_graph();
    let mut total = 0;
    graph.vertex_set().for_each(|v| total += v);
    assert_eq!(total, 6);
}

#[test]
fn test_par_for_each_visits_every_element() {
    let graph = SynchronizedGraph::new(SimpleGraph::<u64>::undirected());
    for v in 1..=1000 {
        graph.add_vertex(v);
    }

    let total = AtomicU64::new(0);
    graph.vertex_set().par_for_each(|v| {
        total.fetch_add(*v, Ordering::Relaxed);
    });
    assert_eq!(total.load(Ordering::Relaxed), 500_500);
}

#[test]
fn test_view_display_and_debug() {
    let graph = build_test_graph();
    assert_eq!(graph.vertex_set().to_string(), "[1, 2, 3]");
    assert_eq!(graph.edge_set().to_string(), "[e0, e1]");
    assert_eq!(format!("{:?}", graph.vertex_set()), "{1, 2, 3}");

    let empty = SynchronizedGraph::new(SimpleGraph::<u32>::directed());
    assert_eq!(empty.vertex_set().to_string(), "[]");
}
