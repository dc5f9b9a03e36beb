// src/api/tests/db_tests.rs

#[cfg(test)]
mod db_tests {
    use crate::api::{find_similar_images, ImageDatabase};
    use crate::core::common::CbirError;
    use crate::core::config::Config;
    use crate::core::indexing::kdtree::SplitMethod;
    use crate::core::types::Point;
    use crate::core::vector::features::FeatureFile;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Image `i` has features scattered around the centre `(10 i, -5 i, 3 i)`.
    fn clustered_database(rng: &mut StdRng, images: usize, per_image: usize) -> Vec<Vec<Point>> {
        (0..images)
            .map(|i| {
                let centre = [10.0 * i as f64, -5.0 * i as f64, 3.0 * i as f64];
                (0..per_image)
                    .map(|_| {
                        let coords = centre.iter().map(|c| c + rng.gen_range(-1.0..1.0)).collect();
                        Point::new(i, coords).unwrap()
                    })
                    .collect()
            })
            .collect()
    }

    fn query_near(rng: &mut StdRng, image: usize, count: usize) -> Vec<Point> {
        let centre = [10.0 * image as f64, -5.0 * image as f64, 3.0 * image as f64];
        (0..count)
            .map(|_| Point::query(centre.iter().map(|c| c + rng.gen_range(-0.5..0.5)).collect()).unwrap())
            .collect()
    }

    fn config(images: usize, similar: usize, knn: usize, method: SplitMethod) -> Config {
        Config::builder()
            .num_of_images(images)
            .num_of_similar_images(similar)
            .knn(knn)
            .split_method(method)
            .split_seed(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_query_finds_its_own_cluster_first() {
        let mut rng = StdRng::seed_from_u64(17);
        let features = clustered_database(&mut rng, 6, 20);

        for method in [SplitMethod::MaxSpread, SplitMethod::Random, SplitMethod::Incremental] {
            let db = ImageDatabase::new(config(6, 3, 5, method), &features).unwrap();
            assert_eq!(db.feature_count(), 120);
            assert_eq!(db.tree().len(), 120);

            let query = query_near(&mut rng, 4, 10);
            let ranked = db.find_similar_images_with_votes(&query).unwrap();
            assert_eq!(ranked.len(), 3);
            assert_eq!(ranked[0].index, 4);
            // Every neighbour of every query feature lies in cluster 4.
            assert_eq!(ranked[0].votes, 50);
            assert_eq!(db.find_similar_images(&query).unwrap()[0], 4);
        }
    }

    #[test]
    fn test_similar_count_capped_to_database() {
        let mut rng = StdRng::seed_from_u64(3);
        let features = clustered_database(&mut rng, 2, 4);
        let db = ImageDatabase::new(config(2, 5, 1, SplitMethod::MaxSpread), &features).unwrap();
        let result = db.find_similar_images(&query_near(&mut rng, 1, 2)).unwrap();
        assert_eq!(result, vec![1, 0]);
    }

    #[test]
    fn test_one_shot_helper_matches_database() {
        let mut rng = StdRng::seed_from_u64(9);
        let features = clustered_database(&mut rng, 4, 8);
        let cfg = config(4, 2, 3, SplitMethod::Incremental);
        let query = query_near(&mut rng, 2, 5);

        let db = ImageDatabase::new(cfg.clone(), &features).unwrap();
        assert_eq!(find_similar_images(&features, &query, &cfg).unwrap(), db.find_similar_images(&query).unwrap());
    }

    #[test]
    fn test_image_count_mismatch_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let features = clustered_database(&mut rng, 3, 2);
        let result = ImageDatabase::new(config(4, 1, 1, SplitMethod::MaxSpread), &features);
        assert!(matches!(result, Err(CbirError::InvalidInput { .. })));
    }

    #[test]
    fn test_stray_owner_is_rejected() {
        let features = vec![
            vec![Point::new(0, vec![1.0]).unwrap()],
            vec![Point::new(0, vec![2.0]).unwrap()],
        ];
        let result = ImageDatabase::new(config(2, 1, 1, SplitMethod::MaxSpread), &features);
        assert!(matches!(result, Err(CbirError::InvalidInput { .. })));
    }

    #[test]
    fn test_no_features_is_rejected() {
        let features = vec![Vec::new(), Vec::new()];
        let result = ImageDatabase::new(config(2, 1, 1, SplitMethod::MaxSpread), &features);
        assert!(matches!(result, Err(CbirError::InvalidInput { .. })));
    }

    #[test]
    fn test_mixed_dimensions_are_rejected() {
        let features = vec![
            vec![Point::new(0, vec![1.0, 2.0]).unwrap()],
            vec![Point::new(1, vec![2.0]).unwrap()],
        ];
        let result = ImageDatabase::new(config(2, 1, 1, SplitMethod::MaxSpread), &features);
        assert!(matches!(result, Err(CbirError::Index(_))));
    }

    #[test]
    fn test_query_dimension_mismatch_fails_whole_ranking() {
        let mut rng = StdRng::seed_from_u64(5);
        let features = clustered_database(&mut rng, 3, 3);
        let db = ImageDatabase::new(config(3, 1, 1, SplitMethod::MaxSpread), &features).unwrap();
        let mut query = query_near(&mut rng, 0, 2);
        query.push(Point::query(vec![0.0]).unwrap());
        assert!(db.find_similar_images(&query).is_err());
    }

    #[test]
    fn test_open_from_feature_files() {
        let dir = tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let features = clustered_database(&mut rng, 3, 5);

        let cfg = Config::builder()
            .images_directory(dir.path())
            .images_prefix("img")
            .images_suffix(".jpg")
            .num_of_images(3)
            .num_of_similar_images(2)
            .knn(2)
            .build()
            .unwrap();
        for (index, points) in features.iter().enumerate() {
            FeatureFile::from_points(index, points)
                .unwrap()
                .save(&cfg.features_path(index).unwrap())
                .unwrap();
        }

        let db = ImageDatabase::open(cfg).unwrap();
        assert_eq!(db.image_count(), 3);
        assert_eq!(db.feature_count(), 15);

        let paths = db.find_similar_image_paths(&query_near(&mut rng, 1, 4)).unwrap();
        assert_eq!(paths[0], dir.path().join("img1.jpg"));
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_open_missing_feature_file() {
        let dir = tempdir().unwrap();
        let cfg = Config::builder().images_directory(PathBuf::from(dir.path())).num_of_images(1).build().unwrap();
        assert!(matches!(ImageDatabase::open(cfg), Err(CbirError::Io(_))));
    }
}
