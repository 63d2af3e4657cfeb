use linfa::prelude::*;
use linfa::Dataset;
use linfa_lars::Lars;
use ndarray::{Array, Array1};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::{StandardNormal, Uniform};
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;

fn main() {
    // synthetic sparse regression problem: 200 samples, 12 features, only
    // 4 of them carry signal
    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let x = Array::random_using((200, 12), Uniform::new(-1.0, 1.0), &mut rng);
    let mut true_beta = Array1::zeros(12);
    true_beta[1] = 4.0;
    true_beta[4] = -2.5;
    true_beta[7] = 1.5;
    true_beta[10] = -3.0;
    let noise: Array1<f64> = Array::random_using(200, StandardNormal, &mut rng) * 0.1;
    let y = x.dot(&true_beta) + noise + 0.5;

    let dataset = Dataset::new(x, y);
    let (train, valid) = dataset.split_with_ratio(0.9);

    let model = Lars::params().verbose(2).fit(&train).unwrap();

    println!("hyperplane: {}", model.hyperplane());
    println!("intercept:  {}", model.intercept());
    println!("alphas:     {}", model.alphas());
    println!("active:     {:?}", model.active());

    // validate
    let y_est = model.predict(&valid);
    println!("predicted variance: {}", valid.r2(&y_est).unwrap());
}
