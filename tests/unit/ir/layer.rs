use super::*;
use crate::foundation::core::Rect;

fn draw_on(bottom: Arc<Layer>, provenance: usize) -> Layer {
    Layer::draw(
        bottom,
        Geometry::Rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
        Paint::default_for(provenance),
        Geometry::Full,
        Transform::IDENTITY,
    )
}

fn chain(len: usize) -> Layer {
    let mut layer = Arc::new(Layer::Empty);
    for i in 0..len {
        layer = Arc::new(draw_on(layer, i));
    }
    Arc::try_unwrap(layer).unwrap_or_else(|shared| (*shared).clone())
}

#[test]
fn equality_is_structural() {
    assert_eq!(chain(3), chain(3));
    assert_ne!(chain(3), chain(4));
}

#[test]
fn equality_sees_provenance() {
    let a = draw_on(Arc::new(Layer::Empty), 1);
    let b = draw_on(Arc::new(Layer::Empty), 2);
    assert_ne!(a, b);
}

#[test]
fn save_layer_compares_both_children() {
    let paint = Paint::default_for(0);
    let a = Layer::save_layer(Arc::new(Layer::Empty), Arc::new(chain(1)), paint);
    let b = Layer::save_layer(Arc::new(Layer::Empty), Arc::new(chain(2)), paint);
    assert_ne!(a, b);
    assert_eq!(a.clone(), a);
}

#[test]
fn long_chains_compare_and_drop_without_recursion() {
    let a = chain(200_000);
    let b = chain(200_000);
    assert!(a == b);
    drop(a);
    drop(b);
}

#[test]
fn stats_count_nodes_and_nesting() {
    let inner = Layer::save_layer(
        Arc::new(Layer::Empty),
        Arc::new(chain(2)),
        Paint::default_for(9),
    );
    let clipped = Layer::clip(Arc::new(inner), Geometry::Full, Transform::IDENTITY);
    let outer = Layer::save_layer(Arc::new(chain(1)), Arc::new(clipped), Paint::default_for(10));
    let stats = outer.stats();
    assert_eq!(stats.draws, 3);
    assert_eq!(stats.save_layers, 2);
    assert_eq!(stats.clips, 1);
    assert_eq!(stats.max_depth, 3);
    assert_eq!(Layer::Empty.stats(), LayerStats::default());
}
