//! Synthetic housing data shaped like the raw `houses.csv` input.

use crate::error::{Error, Result};
use crate::table::{Column, Table};
use crate::Vector;
use ndarray::Array1;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const NEIGHBORHOODS: [&str; 3] = ["downtown", "rural", "suburb"];

const NEIGHBORHOOD_PREMIUM: [f64; 3] = [120_000.0, -30_000.0, 40_000.0];

/// Generates `n_rows` houses whose price is an exact linear function of
/// `sqft_living`, `sqft_lot`, `bedrooms`, `floors` and `neighborhood`.
///
/// `date`, `sqft_above` and `bathrooms` are present but do not influence the
/// price. The same seed always yields the same table.
pub fn make_housing(n_rows: usize, seed: u64) -> Result<Table> {
    if n_rows == 0 {
        return Err(Error::EmptyData("make_housing needs at least one row".to_string()));
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let sqft_living = Vector::random_using(n_rows, Uniform::new(500.0, 4500.0), &mut rng).mapv(f64::round);
    let sqft_lot = Vector::random_using(n_rows, Uniform::new(1000.0, 20000.0), &mut rng).mapv(f64::round);
    let bedrooms = Array1::<u32>::random_using(n_rows, Uniform::new_inclusive(1u32, 6), &mut rng).mapv(f64::from);
    let floors = Array1::<u32>::random_using(n_rows, Uniform::new_inclusive(1u32, 3), &mut rng).mapv(f64::from);
    let half_baths = Array1::<u32>::random_using(n_rows, Uniform::new_inclusive(2u32, 8), &mut rng);
    let basement = Vector::random_using(n_rows, Uniform::new(0.0, 0.4), &mut rng);
    let neighborhood = Array1::<usize>::random_using(n_rows, Uniform::new(0usize, NEIGHBORHOODS.len()), &mut rng);
    let months = Array1::<u32>::random_using(n_rows, Uniform::new_inclusive(1u32, 12), &mut rng);
    let days = Array1::<u32>::random_using(n_rows, Uniform::new_inclusive(1u32, 28), &mut rng);

    let sqft_above = (&sqft_living * &basement.mapv(|b| 1.0 - b)).mapv(f64::round);
    let bathrooms = half_baths.mapv(|b| f64::from(b) / 2.0);
    let premium = neighborhood.mapv(|i| NEIGHBORHOOD_PREMIUM[i]);
    let price = &sqft_living * 200.0 + &sqft_lot * 2.0 + &bedrooms * 10_000.0 + &floors * 25_000.0
        + &premium
        + 50_000.0;

    let dates: Vec<String> = months
        .iter()
        .zip(days.iter())
        .map(|(month, day)| format!("2014{month:02}{day:02}T000000"))
        .collect();
    let neighborhoods: Vec<Option<String>> = neighborhood
        .iter()
        .map(|&i| Some(NEIGHBORHOODS[i].to_string()))
        .collect();

    Table::from_columns([
        ("date", Column::Categorical(dates.into_iter().map(Some).collect())),
        ("price", Column::from(price.to_vec())),
        ("bedrooms", Column::from(bedrooms.to_vec())),
        ("bathrooms", Column::from(bathrooms.to_vec())),
        ("sqft_living", Column::from(sqft_living.to_vec())),
        ("sqft_lot", Column::from(sqft_lot.to_vec())),
        ("floors", Column::from(floors.to_vec())),
        ("sqft_above", Column::from(sqft_above.to_vec())),
        ("neighborhood", Column::Categorical(neighborhoods)),
    ])
}
