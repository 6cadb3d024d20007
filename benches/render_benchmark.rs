use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use drt::integrator::{Estimator, Pathtracer};
use drt::sampler::{RandomSampler, Sampler};
use drt::scenes::cornell_box;
use drt::Vec3;

fn bench(c: &mut Criterion) {
    let cb = cornell_box(64, 48);
    let camera = cb.camera;
    let mut sampler = RandomSampler::new_with_seed(1);

    let mut group = c.benchmark_group("CornellBox");
    group.throughput(Throughput::Elements(1));

    group.bench_function("scene raycast", |b| {
        b.iter(|| {
            let x = (sampler.get_1d() * 64.0) as usize;
            let y = (sampler.get_1d() * 48.0) as usize;
            let (dir, _) = camera.sample(x, y, &mut sampler);
            cb.scene.raycast(camera.eye(), dir)
        })
    });

    for &estimator in &[Estimator::Biased, Estimator::Unbiased] {
        let tracer = Pathtracer::new(0.5, 1).with_estimator(estimator);
        group.bench_function(format!("trace + backward {:?}", estimator), |b| {
            b.iter(|| {
                let (dir, _) = camera.sample(32, 24, &mut sampler);
                let l = tracer.trace(&cb.scene, camera.eye(), dir, 0, &mut sampler);
                l.backward(Vec3::ones());
                l.detach()
            })
        });
    }
    cb.white.zero_grad().unwrap();
    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
