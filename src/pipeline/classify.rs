//! Solve classification.
//!
//! For each new submission the classifier resolves the solving user and
//! team, then evaluates the three notification rules in fixed order:
//! plain solve, first blood, rank change. Each firing rule replaces the
//! rendered message while `announce` stays the OR of all fired rules, so
//! when several rules match the last one's template wins. That override
//! behavior is kept deliberately (see DESIGN.md).

use std::collections::HashSet;

use crate::config::AnnounceConfig;
use crate::error::Result;
use crate::models::{place_emoji, SolveMessage, SolveRecord, Submission, Team, User};
use crate::services::Scoreboard;
use crate::storage::SolveStore;

const PLAIN_HEADLINE: &str =
    ":flags: {user} (Team: {team}) just solved {challenge} and got *{value}* points!";
const PLAIN_FOOTER: &str =
    ":medal: Team {team} is now ranked *{place}* with {score} points total!";
const FIRST_BLOOD_HEADLINE: &str =
    "*First blood!!!*\n\n{user} (Team: {team}) is _*first*_ to solve {challenge}";
const FIRST_BLOOD_FOOTER: &str =
    ":medal: Team {team} is now ranked *{place}* with {score} points!";
const PLACE_CHANGE_FOOTER: &str =
    "{emoji} Team: {team} just moved from *{old_place}* to *{place}* place!";

/// Outcome of classifying one submission.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Whether any enabled rule fired
    pub announce: bool,

    /// The rendered message of the last rule that fired
    pub message: Option<SolveMessage>,
}

/// Classifier for new correct submissions.
pub struct SolveClassifier<'a> {
    announce: &'a AnnounceConfig,
    site_url: &'a str,
    scoreboard: &'a dyn Scoreboard,
    store: &'a dyn SolveStore,
}

impl<'a> SolveClassifier<'a> {
    pub fn new(
        announce: &'a AnnounceConfig,
        site_url: &'a str,
        scoreboard: &'a dyn Scoreboard,
        store: &'a dyn SolveStore,
    ) -> Self {
        Self {
            announce,
            site_url,
            scoreboard,
            store,
        }
    }

    /// Classify one new submission.
    ///
    /// `seen_challenges` must contain the challenge ids of every submission
    /// in the durable seen-log plus those processed earlier in the current
    /// cycle, so first blood fires at most once per challenge.
    ///
    /// Any failed lookup aborts this submission; the caller must not append
    /// it to the seen-log so it gets retried next cycle.
    pub async fn classify(
        &self,
        submission: &Submission,
        seen_challenges: &HashSet<u64>,
    ) -> Result<Classification> {
        let record = self.resolve(submission).await?;
        log::debug!(
            "Classifying solve {}: challenge={} team={} place={} (was {})",
            submission.id,
            record.challenge.name,
            record.team.name,
            record.team.place_label(),
            record.team_old.place_label(),
        );

        let first_blood = !seen_challenges.contains(&submission.challenge_id);
        Ok(self.evaluate(&record, first_blood))
    }

    /// Resolve the composed solve view. Order matters: the old team value
    /// must be read from the cache before the fresh fetch overwrites it.
    async fn resolve(&self, submission: &Submission) -> Result<SolveRecord> {
        // User identity never changes, so cached-or-fetch is permanent.
        let user = match self.store.get_user(submission.user_id).await? {
            Some(user) => user,
            None => {
                let user = self.scoreboard.user(submission.user_id).await?;
                self.store.put_user(&user).await?;
                user
            }
        };

        // Pre-solve snapshot of the team, from the cache when available.
        let team_old = match self.store.get_team(submission.team_id).await? {
            Some(team) => team,
            None => self.scoreboard.team(submission.team_id).await?,
        };

        // Always a fresh fetch; the result becomes the new cached baseline
        // for subsequent solves.
        let team = self.scoreboard.team(submission.team_id).await?;
        self.store.put_team(&team).await?;

        Ok(SolveRecord {
            challenge: submission.challenge.clone(),
            user,
            team,
            team_old,
        })
    }

    /// Evaluate the notification rules against a resolved solve.
    fn evaluate(&self, record: &SolveRecord, first_blood: bool) -> Classification {
        let mut announce = false;
        let mut message = None;

        // Rule 1: plain solve. The top10-only restriction collapses
        // eligibility entirely, it never falls through to other rules.
        let plain_fires = self.announce.post_solve
            && (!self.announce.solve_top10_only || record.team.in_top10());
        if plain_fires {
            announce = true;
            message = Some(SolveMessage {
                headline: self.fill(PLAIN_HEADLINE, record),
                image_url: self.announce.solve_image.clone(),
                alt_text: "Challenge solved!".to_string(),
                footer: self.fill(PLAIN_FOOTER, record),
            });
        }

        // Rule 2: first blood.
        if first_blood && self.announce.post_first_blood {
            announce = true;
            message = Some(SolveMessage {
                headline: self.fill(FIRST_BLOOD_HEADLINE, record),
                image_url: self.announce.first_blood_image.clone(),
                alt_text: "First blood!".to_string(),
                footer: self.fill(FIRST_BLOOD_FOOTER, record),
            });
        }

        // Rule 3: rank change into/within the top ten.
        let rank_changed = record.team.in_top10() && record.team.place != record.team_old.place;
        if rank_changed && self.announce.post_place_change {
            announce = true;
            message = Some(SolveMessage {
                headline: self.fill(PLAIN_HEADLINE, record),
                image_url: self.announce.place_change_image.clone(),
                alt_text: "Place change!".to_string(),
                footer: self.fill(PLACE_CHANGE_FOOTER, record),
            });
        }

        Classification { announce, message }
    }

    /// Fill a message template.
    ///
    /// Supported placeholders:
    /// - `{user}`, `{team}`, `{challenge}` — mrkdwn links
    /// - `{value}`, `{place}`, `{old_place}`, `{score}`, `{emoji}`
    fn fill(&self, template: &str, record: &SolveRecord) -> String {
        template
            .replace("{user}", &self.user_link(&record.user))
            .replace("{team}", &self.team_link(&record.team))
            .replace("{challenge}", &self.challenge_link(&record.challenge.name))
            .replace("{value}", &record.challenge.value.to_string())
            .replace("{place}", record.team.place_label())
            .replace("{old_place}", record.team_old.place_label())
            .replace("{score}", &record.team.score.to_string())
            .replace("{emoji}", place_emoji(record.team.place_label()))
    }

    fn site(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }

    fn user_link(&self, user: &User) -> String {
        format!("<{}/users/{}|{}>", self.site(), user.id, user.name)
    }

    fn team_link(&self, team: &Team) -> String {
        format!("<{}/teams/{}|{}>", self.site(), team.id, team.name)
    }

    fn challenge_link(&self, name: &str) -> String {
        format!("<{}/challenges#{name}|{name}>", self.site())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{submission, team, user, FakeScoreboard};
    use crate::storage::LocalStore;
    use tempfile::TempDir;

    const SITE: &str = "https://ctf.example.com";

    fn announce_all() -> AnnounceConfig {
        AnnounceConfig {
            post_solve: true,
            post_first_blood: true,
            post_place_change: true,
            ..AnnounceConfig::default()
        }
    }

    fn scoreboard_with(team_place: Option<&str>) -> FakeScoreboard {
        let scoreboard = FakeScoreboard::default();
        scoreboard.add_user(user(7, "alice"));
        scoreboard.set_team(team(2, "hexors", team_place, 800));
        scoreboard
    }

    async fn classify_one(
        config: &AnnounceConfig,
        scoreboard: &FakeScoreboard,
        store: &LocalStore,
        seen: &HashSet<u64>,
    ) -> Classification {
        let classifier = SolveClassifier::new(config, SITE, scoreboard, store);
        classifier
            .classify(&submission(1, 10, 7, 2), seen)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn first_blood_fires_for_unseen_challenge() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = AnnounceConfig {
            post_first_blood: true,
            ..AnnounceConfig::default()
        };
        let scoreboard = scoreboard_with(Some("15th"));

        let result = classify_one(&config, &scoreboard, &store, &HashSet::new()).await;
        assert!(result.announce);
        let message = result.message.unwrap();
        assert!(message.headline.contains("First blood!!!"));
        assert!(message.headline.contains("<https://ctf.example.com/users/7|alice>"));
    }

    #[tokio::test]
    async fn first_blood_never_fires_twice() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = AnnounceConfig {
            post_first_blood: true,
            ..AnnounceConfig::default()
        };
        let scoreboard = scoreboard_with(Some("15th"));

        let seen: HashSet<u64> = [10].into_iter().collect();
        let result = classify_one(&config, &scoreboard, &store, &seen).await;
        assert!(!result.announce);
        assert!(result.message.is_none());
    }

    #[tokio::test]
    async fn top10_only_suppresses_plain_solve() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = AnnounceConfig {
            post_solve: true,
            solve_top10_only: true,
            ..AnnounceConfig::default()
        };
        let scoreboard = scoreboard_with(Some("42nd"));

        let result = classify_one(&config, &scoreboard, &store, &HashSet::new()).await;
        assert!(!result.announce);
    }

    #[tokio::test]
    async fn top10_only_allows_top10_team() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = AnnounceConfig {
            post_solve: true,
            solve_top10_only: true,
            ..AnnounceConfig::default()
        };
        let scoreboard = scoreboard_with(Some("9th"));

        let result = classify_one(&config, &scoreboard, &store, &HashSet::new()).await;
        assert!(result.announce);
        let message = result.message.unwrap();
        assert!(message.headline.contains("just solved"));
        assert!(message.footer.contains("*9th*"));
    }

    #[tokio::test]
    async fn rank_change_fires_on_move_into_top10() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = AnnounceConfig {
            post_place_change: true,
            ..AnnounceConfig::default()
        };
        // Cached pre-solve snapshot says 15th, fresh fetch says 9th.
        store.put_team(&team(2, "hexors", Some("15th"), 700)).await.unwrap();
        let scoreboard = scoreboard_with(Some("9th"));

        let result = classify_one(&config, &scoreboard, &store, &HashSet::new()).await;
        assert!(result.announce);
        let message = result.message.unwrap();
        assert!(message.footer.contains("from *15th* to *9th*"));
        assert_eq!(message.alt_text, "Place change!");
    }

    #[tokio::test]
    async fn rank_change_quiet_when_place_unchanged() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = AnnounceConfig {
            post_place_change: true,
            ..AnnounceConfig::default()
        };
        store.put_team(&team(2, "hexors", Some("9th"), 700)).await.unwrap();
        let scoreboard = scoreboard_with(Some("9th"));

        let result = classify_one(&config, &scoreboard, &store, &HashSet::new()).await;
        assert!(!result.announce);
    }

    #[tokio::test]
    async fn podium_move_uses_medal_emoji() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = AnnounceConfig {
            post_place_change: true,
            ..AnnounceConfig::default()
        };
        store.put_team(&team(2, "hexors", Some("4th"), 700)).await.unwrap();
        let scoreboard = scoreboard_with(Some("1st"));

        let result = classify_one(&config, &scoreboard, &store, &HashSet::new()).await;
        let message = result.message.unwrap();
        assert!(message.footer.starts_with(":first_place_medal:"));
    }

    #[tokio::test]
    async fn later_rule_overrides_rendered_content() {
        // Plain solve and first blood both fire; the first-blood template
        // wins the rendered content while announce stays true.
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = AnnounceConfig {
            post_solve: true,
            post_first_blood: true,
            ..AnnounceConfig::default()
        };
        let scoreboard = scoreboard_with(Some("42nd"));

        let result = classify_one(&config, &scoreboard, &store, &HashSet::new()).await;
        assert!(result.announce);
        let message = result.message.unwrap();
        assert!(message.headline.contains("First blood!!!"));
        assert_eq!(message.alt_text, "First blood!");
    }

    #[tokio::test]
    async fn unranked_team_fires_nothing_rank_related() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let mut config = announce_all();
        config.solve_top10_only = true;
        config.post_first_blood = false;
        let scoreboard = scoreboard_with(None);

        let result = classify_one(&config, &scoreboard, &store, &HashSet::new()).await;
        assert!(!result.announce);
    }

    #[tokio::test]
    async fn fresh_team_fetch_becomes_new_cache_baseline() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        store.put_team(&team(2, "hexors", Some("15th"), 700)).await.unwrap();
        let scoreboard = scoreboard_with(Some("9th"));

        classify_one(&announce_all(), &scoreboard, &store, &HashSet::new()).await;

        let cached = store.get_team(2).await.unwrap().unwrap();
        assert_eq!(cached.place.as_deref(), Some("9th"));
    }

    #[tokio::test]
    async fn user_lookup_is_cached_permanently() {
        use std::sync::atomic::Ordering;

        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let scoreboard = scoreboard_with(Some("15th"));
        let config = announce_all();

        classify_one(&config, &scoreboard, &store, &HashSet::new()).await;
        classify_one(&config, &scoreboard, &store, &HashSet::new()).await;

        assert_eq!(scoreboard.user_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_team_lookup_aborts_submission() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let scoreboard = scoreboard_with(Some("15th"));
        scoreboard.fail_team(2);
        let config = announce_all();

        let classifier = SolveClassifier::new(&config, SITE, &scoreboard, &store);
        let result = classifier
            .classify(&submission(1, 10, 7, 2), &HashSet::new())
            .await;
        assert!(result.is_err());
    }
}
