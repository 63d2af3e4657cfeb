use linfa::ParamGuard;
use linfa_lars::{Lars, LarsSolver};
use ndarray::{Array, Array1};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;

fn main() {
    let mut rng = Xoshiro256Plus::seed_from_u64(7);
    let x = Array::random_using((60, 8), Uniform::new(-1.0, 1.0), &mut rng);
    let mut true_beta = Array1::zeros(8);
    true_beta[0] = 3.0;
    true_beta[3] = -2.0;
    true_beta[6] = 1.0;
    let y = x.dot(&true_beta);

    let params = Lars::params()
        .fit_intercept(false)
        .lasso(0.5)
        .check()
        .unwrap();
    let mut solver = LarsSolver::new(&params, x.view(), y.view());
    solver.run().unwrap();

    println!("LASSO path down to lambda = 0.5");
    for (lambda, beta) in solver.lambda_path().iter().zip(solver.beta_path()) {
        println!("lambda = {:>10.5}  beta = {}", lambda, beta);
    }
    println!("active: {:?}", solver.active());

    // replace one of the noise columns in place and retrace the path
    // against the updated design
    let replacement = Array::random_using((60, 1), Uniform::new(-1.0, 1.0), &mut rng);
    solver.update_columns(&[5], replacement.view()).unwrap();
    solver.run_with_target(0.25).unwrap();

    println!("\nafter replacing column 5, down to lambda = 0.25");
    let last = solver.lambda_path().len() - 1;
    println!(
        "lambda = {:>10.5}  beta = {}",
        solver.lambda_path()[last],
        solver.beta_path().last().unwrap()
    );
}
