use criterion::{Criterion, black_box, criterion_group, criterion_main};
use physlab::prelude::*;
use physlab::sims::{Fluid, FluidParams, Orbit, Pendulum, Projectile};
use physlab::svg;

const VIEW: Viewport = Viewport::new(160, 96);

fn bench_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("physlab/tick");

    for kind in SimKind::ALL {
        group.bench_function(kind.name(), |b| {
            let mut runner = kind.runner();
            runner.start();
            b.iter(|| {
                if !runner.is_running() {
                    runner.reset();
                    runner.start();
                }
                black_box(runner.tick())
            });
        });
    }

    group.finish();
}

fn bench_steppers(c: &mut Criterion) {
    let mut group = c.benchmark_group("physlab/step");

    group.bench_function("pendulum", |b| {
        let params = <Pendulum as Simulation>::Params::default();
        let mut state = Pendulum::init(&params);
        b.iter(|| Pendulum::step(black_box(&mut state), &params, 0.0025));
    });

    group.bench_function("orbit", |b| {
        let params = <Orbit as Simulation>::Params::default();
        let mut state = Orbit::init(&params);
        b.iter(|| Orbit::step(black_box(&mut state), &params, 0.01));
    });

    group.bench_function("fluid/600", |b| {
        let params = FluidParams {
            particles: 600.0,
            ..FluidParams::default()
        };
        let mut state = Fluid::init(&params);
        b.iter(|| Fluid::step(black_box(&mut state), &params, 0.01));
    });

    group.bench_function("projectile/flight", |b| {
        b.iter(|| {
            let mut driver = Driver::<Projectile>::default();
            driver.start();
            while driver.tick() {}
            black_box(driver.state().landing)
        });
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("physlab/render");
    let toggles = Toggles {
        vectors: true,
        ..Toggles::default()
    };

    for kind in SimKind::ALL {
        let mut runner = kind.runner();
        runner.start();
        for _ in 0..100 {
            runner.tick();
        }
        let scene = runner.scene(&toggles, VIEW);

        group.bench_function(format!("canvas/{kind}"), |b| {
            let mut canvas = Canvas::new(VIEW);
            b.iter(|| canvas.paint(black_box(&scene)));
        });

        group.bench_function(format!("svg/{kind}"), |b| {
            b.iter(|| black_box(svg::render(&scene, VIEW)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ticks, bench_steppers, bench_render);
criterion_main!(benches);
