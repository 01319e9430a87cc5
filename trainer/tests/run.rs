use std::{fmt::Write, fs};

use pipeline::{
    MlErr,
    artifact::{FsModelStore, MODEL_NAME, ModelStore, ModelTag, VERSION_LEN, Version},
};
use trainer::{TrainErr, configs::TrainingConfig, run};

/// Raw rows without any derived column; those are built during the run.
fn write_csv(path: &std::path::Path, n: usize) {
    let mut csv = String::from(
        "PropertyGFATotal,PropertyGFABuilding(s),PropertyGFAParking,NumberofBuildings,\
NumberofFloors,YearBuilt,PrimaryPropertyType,LargestPropertyUseType,CouncilDistrictCode,\
Neighborhood,Latitude,Longitude,GeoCluster,SiteEnergyUse(kBtu)\n",
    );
    for i in 0..n {
        let total = 10_000 + 500 * i;
        writeln!(
            csv,
            "{total},{total},0,1,{},{},Office,Office,{},DOWNTOWN,47.61,-122.33,{},{}",
            1 + i % 5,
            1950 + i,
            1 + i % 3,
            i % 2,
            30 * total,
        )
        .unwrap();
    }
    fs::write(path, csv).unwrap();
}

fn config(dir: &std::path::Path, n: usize) -> TrainingConfig {
    let data = dir.join("data.csv");
    write_csv(&data, n);

    let mut config = TrainingConfig::new(data);
    config.store_root = dir.join("models");
    config
}

#[test]
fn trains_and_saves_a_generated_version() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 30);

    let tag = run(&config).unwrap();
    assert_eq!(tag.name, MODEL_NAME);
    let Version::Pinned(version) = &tag.version else {
        panic!("saved tag {tag} is not pinned");
    };
    assert_eq!(version.len(), VERSION_LEN);

    let store = FsModelStore::new(&config.store_root);
    let latest = ModelTag::latest(MODEL_NAME).unwrap();
    assert_eq!(&store.resolve(&latest).unwrap(), version);

    let artifact = store.load(&latest).unwrap();
    assert!(artifact.meta.evaluation.is_some());
    assert_eq!(artifact.meta.target, "SiteEnergyUse(kBtu)");
}

#[test]
fn pinned_version_is_used_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), 20);
    config.version = Some("release1".to_string());

    let tag = run(&config).unwrap();
    assert_eq!(tag.to_string(), "energy_consumption_model:release1");

    let err = run(&config).unwrap_err();
    assert!(matches!(err, TrainErr::Store(_)), "got {err}");
}

#[test]
fn too_few_rows_fail() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 1);

    let err = run(&config).unwrap_err();
    assert!(
        matches!(err, TrainErr::Ml(MlErr::NotEnoughRows { got: 1, needed: 2 })),
        "got {err}"
    );
}

#[test]
fn missing_columns_fail() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    fs::write(&data, "PropertyGFATotal,SiteEnergyUse(kBtu)\n100,5\n200,9\n").unwrap();

    let err = run(&TrainingConfig::new(data)).unwrap_err();
    assert!(matches!(err, TrainErr::Ml(MlErr::MissingColumn(_))), "got {err}");
}
