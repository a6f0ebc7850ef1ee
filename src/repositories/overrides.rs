/// Per-attempt effective close time and time limit.
///
/// Produces rows of `(id, usertimeclose, usertimelimit)` for every attempt matching
/// `attempt_filter`, which may refer to the attempt as `iqa` and the quiz as `iq`.
/// A user override wins over group overrides. Among the user's groups an unlimited
/// value (`0`) wins, otherwise the most generous one does; with no override at all
/// the quiz defaults apply.
///
/// Every query that needs effective times goes through this fragment so the sweep
/// and the interactive attempt view always agree.
pub(crate) fn usertime_sql(attempt_filter: &str) -> String {
    format!(
        "SELECT iqa.id,
                COALESCE(quo.timeclose, MAX(qgo1.timeclose), MAX(qgo2.timeclose), iq.timeclose)
                    AS usertimeclose,
                COALESCE(quo.timelimit, MAX(qgo3.timelimit), MAX(qgo4.timelimit), iq.timelimit)
                    AS usertimelimit
           FROM quiz_attempts iqa
           JOIN quizzes iq ON iq.id = iqa.quiz_id
      LEFT JOIN quiz_overrides quo
             ON quo.quiz_id = iqa.quiz_id AND quo.user_id = iqa.user_id
      LEFT JOIN group_members gm ON gm.user_id = iqa.user_id
      LEFT JOIN quiz_overrides qgo1
             ON qgo1.quiz_id = iqa.quiz_id AND qgo1.group_id = gm.group_id AND qgo1.timeclose = 0
      LEFT JOIN quiz_overrides qgo2
             ON qgo2.quiz_id = iqa.quiz_id AND qgo2.group_id = gm.group_id AND qgo2.timeclose > 0
      LEFT JOIN quiz_overrides qgo3
             ON qgo3.quiz_id = iqa.quiz_id AND qgo3.group_id = gm.group_id AND qgo3.timelimit = 0
      LEFT JOIN quiz_overrides qgo4
             ON qgo4.quiz_id = iqa.quiz_id AND qgo4.group_id = gm.group_id AND qgo4.timelimit > 0
          WHERE {attempt_filter}
       GROUP BY iqa.id, quo.timeclose, quo.timelimit, iq.timeclose, iq.timelimit"
    )
}
