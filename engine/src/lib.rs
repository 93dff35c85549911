// Copyright (C) 2020 Kevin Del Castillo Ramírez
//
// This file is part of movie-ratings.
//
// movie-ratings is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// movie-ratings is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with movie-ratings.  If not, see <http://www.gnu.org/licenses/>.

pub mod distances;
pub mod error;
pub mod judgment;
pub mod predict;
pub mod stats;

use anyhow::Error;
use controller::{Controller, Rating};

pub use judgment::{Judge, DEFAULT_MESSAGES};

/// Everything the movie page shows about a movie for some viewer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieOutlook {
    pub ratings: Vec<Rating>,
    pub average: Option<f64>,
    pub viewer_rating: Option<i32>,
    pub prediction: Option<f64>,
    pub eye_score: Option<f64>,
    pub beratement: Option<String>,
}

impl MovieOutlook {
    /// The score the viewer gave or would give to the movie
    pub fn viewer_score(&self) -> Option<f64> {
        self.viewer_rating.map(f64::from).or(self.prediction)
    }
}

pub struct Engine<'a, C: Controller> {
    controller: &'a C,
    judge: Judge,
}

impl<'a, C: Controller> Engine<'a, C> {
    pub fn with_controller(controller: &'a C) -> Self {
        Self {
            controller,
            judge: Judge::default(),
        }
    }

    pub fn with_judge(mut self, judge: Judge) -> Self {
        self.judge = judge;
        self
    }

    /// Mean score of a movie and how many ratings it has
    pub fn average(&self, movie_id: i32) -> Result<(Option<f64>, usize), Error> {
        let ratings = self.controller.movie_ratings(movie_id)?;
        Ok((stats::mean(ratings.iter().map(|r| r.score)), ratings.len()))
    }

    /// Predict the score an user would give to a movie
    pub fn predict(&self, user_id: i32, movie_id: i32) -> Result<Option<f64>, Error> {
        let ratings = self.controller.movie_ratings(movie_id)?;
        self.predict_among(user_id, movie_id, &ratings)
    }

    fn predict_among(
        &self,
        user_id: i32,
        movie_id: i32,
        movie_ratings: &[Rating],
    ) -> Result<Option<f64>, Error> {
        let raters: Vec<_> = movie_ratings
            .iter()
            .map(|r| r.user_id)
            .filter(|id| *id != user_id)
            .collect();

        if raters.is_empty() {
            return Ok(None);
        }

        let target = self.controller.ratings_by(user_id)?;
        let others = self.controller.maped_ratings_by(&raters)?;

        let prediction = predict::weighted_prediction(&target, &others, &movie_id);
        log::debug!(
            "Prediction for user({}) on movie({}) among {} raters: {:?}",
            user_id,
            movie_id,
            raters.len(),
            prediction
        );

        Ok(prediction)
    }

    /// Gather ratings, average, the viewer's score and the eye's judgment
    /// of a movie. `viewer` and `eye` are user ids, both optional.
    pub fn movie_outlook(
        &self,
        movie_id: i32,
        viewer: Option<i32>,
        eye: Option<i32>,
    ) -> Result<MovieOutlook, Error> {
        let ratings = self.controller.movie_ratings(movie_id)?;
        let average = stats::mean(ratings.iter().map(|r| r.score));

        let mut outlook = MovieOutlook {
            average,
            ..Default::default()
        };

        if let Some(viewer) = viewer {
            outlook.viewer_rating = ratings
                .iter()
                .find(|r| r.user_id == viewer)
                .map(|r| r.score);

            if outlook.viewer_rating.is_none() {
                outlook.prediction = self.predict_among(viewer, movie_id, &ratings)?;
            }
        }

        if let Some(eye) = eye {
            outlook.eye_score = match ratings.iter().find(|r| r.user_id == eye) {
                Some(rating) => Some(f64::from(rating.score)),
                None => self.predict_among(eye, movie_id, &ratings)?,
            };
        }

        if let (Some(eye_score), Some(viewer_score)) = (outlook.eye_score, outlook.viewer_score()) {
            outlook.beratement = Some(self.judge.beratement(eye_score, viewer_score)?.to_owned());
        }

        outlook.ratings = ratings;
        Ok(outlook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use controller::{MemoryController, NewMovie, NewUser};

    // Users 1..=4, movies 1..=4. User 1 and 2 agree, user 3 disagrees with
    // both, user 4 (the eye) agrees with user 2
    fn populated() -> Result<MemoryController, Error> {
        let controller = MemoryController::new();

        for _ in 0..4 {
            controller.insert_new_user(NewUser::anonymous(None, None))?;
        }

        for title in &["Alien", "Brazil", "Casablanca", "Dune"] {
            controller.insert_new_movie(NewMovie {
                title: title.to_string(),
                released_at: None,
                imdb_url: None,
            })?;
        }

        let scores = [
            (1, 1, 1),
            (1, 2, 3),
            (1, 3, 5),
            (2, 1, 1),
            (2, 2, 3),
            (2, 3, 5),
            (2, 4, 2),
            (3, 1, 5),
            (3, 2, 3),
            (3, 3, 1),
            (3, 4, 5),
            (4, 1, 2),
            (4, 2, 3),
            (4, 3, 4),
        ];

        for (user, movie, score) in scores.iter() {
            controller.insert_rating(*user, *movie, *score)?;
        }

        Ok(controller)
    }

    #[test]
    fn average_of_movie() -> Result<(), Error> {
        let controller = populated()?;
        let engine = Engine::with_controller(&controller);

        let (average, count) = engine.average(4)?;
        assert_eq!(count, 2);
        assert_approx_eq!(average.unwrap(), 3.5);

        let (average, count) = engine.average(99)?;
        assert_eq!((average, count), (None, 0));

        Ok(())
    }

    #[test]
    fn predict_ignores_opposite_taste() -> Result<(), Error> {
        let controller = populated()?;
        let engine = Engine::with_controller(&controller);

        // Only user 2 is similar to user 1 among those who rated movie 4
        assert_approx_eq!(engine.predict(1, 4)?.unwrap(), 2.0);

        Ok(())
    }

    #[test]
    fn outlook_for_anonymous_viewer() -> Result<(), Error> {
        let controller = populated()?;
        let engine = Engine::with_controller(&controller);

        let outlook = engine.movie_outlook(1, None, Some(4))?;
        assert_eq!(outlook.ratings.len(), 4);
        assert_approx_eq!(outlook.average.unwrap(), 2.25);
        assert_eq!(outlook.viewer_rating, None);
        assert_eq!(outlook.prediction, None);
        assert_eq!(outlook.eye_score, Some(2.0));
        assert_eq!(outlook.beratement, None);

        Ok(())
    }

    #[test]
    fn outlook_with_rating_and_judgment() -> Result<(), Error> {
        let controller = populated()?;
        let engine = Engine::with_controller(&controller);

        let outlook = engine.movie_outlook(1, Some(3), Some(4))?;
        assert_eq!(outlook.viewer_rating, Some(5));
        assert_eq!(outlook.prediction, None);
        assert_eq!(outlook.viewer_score(), Some(5.0));
        assert_eq!(outlook.beratement.as_deref(), Some(DEFAULT_MESSAGES[3]));

        Ok(())
    }

    #[test]
    fn outlook_with_predictions() -> Result<(), Error> {
        let controller = populated()?;
        let judge = Judge::with_messages(vec!["close".into(), "far".into()]);
        let engine = Engine::with_controller(&controller).with_judge(judge);

        // Neither user 1 nor the eye rated movie 4, both get predictions
        let outlook = engine.movie_outlook(4, Some(1), Some(4))?;
        assert_eq!(outlook.viewer_rating, None);
        assert_approx_eq!(outlook.prediction.unwrap(), 2.0);
        assert_approx_eq!(outlook.eye_score.unwrap(), 2.0);
        assert_eq!(outlook.beratement.as_deref(), Some("close"));

        Ok(())
    }
}
