use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cortexmesh::{
    expand_to_full, match_nodes, restrict_mesh_to_cortex, translate_to_restricted, BrainMesh,
    CortexLabel,
};

/// A wavy n x n grid surface with 2 triangles per cell.
fn grid_mesh(n: usize, spacing: f32) -> BrainMesh {
    let mut vertices: Vec<[f32; 3]> = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let (x, y) = (i as f32 * spacing, j as f32 * spacing);
            vertices.push([x, y, (x * 0.1).sin() * 3.0]);
        }
    }
    let mut triangles: Vec<[i32; 3]> = Vec::with_capacity(2 * n * n);
    for i in 0..n - 1 {
        for j in 0..n - 1 {
            let v = (i * n + j) as i32;
            let n = n as i32;
            triangles.push([v, v + 1, v + n]);
            triangles.push([v + 1, v + n + 1, v + n]);
        }
    }
    BrainMesh::from_triangles(&vertices, &triangles).unwrap()
}

/// All vertices outside a disc in the middle of the grid, in reverse order.
fn cortex_of(mesh: &BrainMesh) -> CortexLabel {
    let n = (mesh.num_vertices() as f32).sqrt();
    let center = n / 2.0;
    let mut cortex: Vec<usize> = (0..mesh.num_vertices())
        .filter(|v| {
            let [x, y, _] = mesh.vertex(*v);
            (x - center).powi(2) + (y - center).powi(2) > (n / 4.0).powi(2)
        })
        .collect();
    cortex.reverse();
    CortexLabel::new(cortex).unwrap()
}

fn bench_cortex(c: &mut Criterion) {
    let surf = grid_mesh(300, 1.0);
    let cortex = cortex_of(&surf);
    let restricted_data: Vec<f32> = (0..cortex.len()).map(|v| v as f32).collect();
    let src: Vec<usize> = (0..surf.num_vertices()).step_by(7).collect();

    c.bench_function("restrict_mesh_to_cortex", |b| {
        b.iter(|| restrict_mesh_to_cortex(black_box(&surf), black_box(&cortex)).unwrap())
    });
    c.bench_function("translate_to_restricted", |b| {
        b.iter(|| translate_to_restricted(black_box(&src), black_box(&cortex)))
    });
    c.bench_function("expand_to_full", |b| {
        b.iter(|| expand_to_full(black_box(&restricted_data), surf.num_vertices(), black_box(&cortex)).unwrap())
    });
}

fn bench_match(c: &mut Criterion) {
    let simple = grid_mesh(40, 2.0).vertex_coords();
    let complex = grid_mesh(80, 1.0).vertex_coords();

    c.bench_function("match_nodes", |b| {
        b.iter(|| match_nodes(black_box(&simple), black_box(&complex)).unwrap())
    });
}

criterion_group!(benches, bench_cortex, bench_match);
criterion_main!(benches);
